use crate::models::{AccessPoint, Individual};
use rand::Rng;
use tracing::instrument;

/// Performs single-point crossover at the specified cut point.
///
/// The child takes access points `[0, point)` from `lhs` and `[point, len)` from `rhs`.
///
/// # Panics
///
/// Panics if the parents differ in length or `point` exceeds it.
pub fn crossover_at(lhs: &Individual, rhs: &Individual, point: usize) -> Individual {
    let lhs_aps = lhs.access_points();
    let rhs_aps = rhs.access_points();
    assert_eq!(
        lhs_aps.len(),
        rhs_aps.len(),
        "crossover parents must carry the same number of access points"
    );

    let mut access_points: Vec<AccessPoint> = Vec::with_capacity(lhs_aps.len());
    access_points.extend_from_slice(&lhs_aps[..point]); // Head from lhs
    access_points.extend_from_slice(&rhs_aps[point..]); // Tail from rhs
    Individual::new(access_points)
}

/// Single-point crossover with a cut drawn uniformly from `[1, len - 1]`.
///
/// Both parents always contribute at least one access point. A single access
/// point cannot be split, so the child is then a copy of `lhs`.
#[instrument(level = "debug", skip(rng, lhs, rhs), fields(ap_count = lhs.len()))]
pub fn crossover<R: Rng>(rng: &mut R, lhs: &Individual, rhs: &Individual) -> Individual {
    let len = lhs.len();
    if len < 2 {
        return crossover_at(lhs, rhs, len);
    }

    let point = rng.random_range(1..len); // Cut point
    crossover_at(lhs, rhs, point)
}
