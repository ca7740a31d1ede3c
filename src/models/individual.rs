use super::AccessPoint;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One candidate placement: an ordered sequence of access points.
///
/// Order only matters to crossover, which splits the sequence at an index.
/// Fitness is independent of it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Individual {
    access_points: Vec<AccessPoint>,
}

impl Individual {
    pub fn new(access_points: Vec<AccessPoint>) -> Self {
        Self { access_points }
    }

    /// Draws `ap_count` independent, uniformly placed access points.
    #[instrument(level = "debug", skip(rng))]
    pub fn random<R: Rng>(rng: &mut R, ap_count: usize, area_size: i32) -> Self {
        let access_points = (0..ap_count)
            .map(|_| AccessPoint::random(rng, area_size))
            .collect();
        Self { access_points }
    }

    pub fn access_points(&self) -> &[AccessPoint] {
        &self.access_points
    }

    pub fn len(&self) -> usize {
        self.access_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.access_points.is_empty()
    }
}

impl From<Vec<AccessPoint>> for Individual {
    fn from(access_points: Vec<AccessPoint>) -> Self {
        Self::new(access_points)
    }
}
