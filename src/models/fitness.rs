//! Scoring of a candidate placement against the served population.
//!
//! Every user is associated with at most one access point within the coverage
//! radius. Among the reachable access points the one carrying the least demand
//! so far wins, then the nearest, then the lowest index. This greedy,
//! order-dependent association is intentional and changing it changes scores.
//!
//! The score is the covered demand minus weighted penalties:
//!
//! | Term | Weight |
//! |------|--------|
//! | total user-to-AP distance | 0.05 |
//! | same-channel AP pairs within 1.5 × radius | 4 |
//! | demand above 8.0 per AP | 1.5 |
//! | uncovered users | 5 |
//! | AP pairs closer than 20 units | 2 |
//! | AP pairs closer than 2 × radius | 3 |

use super::{Evaluator, Individual, User};
use serde::Serialize;
use std::sync::Arc;

/// Demand a single access point can serve before it is penalized.
pub const AP_CAPACITY: f64 = 8.0;

/// Access points closer than this are physically crowded.
pub const MIN_SEPARATION: f64 = 20.0;

/// Same-channel access points interfere below this multiple of the radius.
pub const CHANNEL_REUSE_FACTOR: f64 = 1.5;

/// Access points overlap redundantly below this multiple of the radius.
pub const OVERLAP_FACTOR: f64 = 2.0;

const DISTANCE_WEIGHT: f64 = 0.05;
const CHANNEL_CONFLICT_WEIGHT: f64 = 4.0;
const CAPACITY_WEIGHT: f64 = 1.5;
const UNCOVERED_WEIGHT: f64 = 5.0;
const CROWDING_WEIGHT: f64 = 2.0;
const OVERLAP_WEIGHT: f64 = 3.0;

/// Every term that goes into a placement's score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fitness {
    pub covered_demand: f64,
    pub total_distance: f64,
    pub uncovered_users: usize,
    pub channel_conflicts: usize,
    pub physical_crowding: usize,
    pub coverage_overlap: usize,
    pub capacity_penalty: f64,
    /// Demand assigned to each access point, by index.
    pub loads: Vec<f64>,
}

impl Fitness {
    pub fn score(&self) -> f64 {
        self.covered_demand
            - DISTANCE_WEIGHT * self.total_distance
            - CHANNEL_CONFLICT_WEIGHT * self.channel_conflicts as f64
            - CAPACITY_WEIGHT * self.capacity_penalty
            - UNCOVERED_WEIGHT * self.uncovered_users as f64
            - CROWDING_WEIGHT * self.physical_crowding as f64
            - OVERLAP_WEIGHT * self.coverage_overlap as f64
    }
}

/// Sum of load above [`AP_CAPACITY`] across access points.
pub fn capacity_penalty(loads: &[f64]) -> f64 {
    loads
        .iter()
        .filter(|&&load| load > AP_CAPACITY)
        .map(|load| load - AP_CAPACITY)
        .sum()
}

#[derive(Debug, Default, PartialEq, Eq)]
struct PairPenalties {
    channel_conflicts: usize,
    physical_crowding: usize,
    coverage_overlap: usize,
}

/// Scans every access point pair once.
fn pair_penalties(individual: &Individual, coverage_radius: f64) -> PairPenalties {
    let aps = individual.access_points();
    let mut penalties = PairPenalties::default();

    for (i, lhs) in aps.iter().enumerate() {
        for rhs in &aps[i + 1..] {
            let d = lhs.position.distance_to(&rhs.position);
            if lhs.channel == rhs.channel && d < coverage_radius * CHANNEL_REUSE_FACTOR {
                penalties.channel_conflicts += 1;
            }
            if d < MIN_SEPARATION {
                penalties.physical_crowding += 1;
            }
            if d < coverage_radius * OVERLAP_FACTOR {
                penalties.coverage_overlap += 1;
            }
        }
    }

    penalties
}

/// Scores placements against a fixed user population.
#[derive(Debug, Clone)]
pub struct CoverageEvaluator {
    users: Arc<[User]>,
    coverage_radius: f64,
}

impl CoverageEvaluator {
    pub fn new(users: impl Into<Arc<[User]>>, coverage_radius: f64) -> Self {
        Self {
            users: users.into(),
            coverage_radius,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn coverage_radius(&self) -> f64 {
        self.coverage_radius
    }

    /// Computes the full breakdown for one placement.
    pub fn evaluate(&self, individual: &Individual) -> Fitness {
        let aps = individual.access_points();
        let mut loads = vec![0.0; aps.len()];
        let mut covered_demand = 0.0;
        let mut total_distance = 0.0;
        let mut uncovered_users = 0;

        for user in self.users.iter() {
            // (index, distance) of the least loaded, then nearest, reachable AP
            let mut chosen: Option<(usize, f64)> = None;

            for (index, ap) in aps.iter().enumerate() {
                let d = user.position.distance_to(&ap.position);
                if d > self.coverage_radius {
                    continue;
                }

                let better = match chosen {
                    None => true,
                    Some((best, best_d)) => {
                        loads[index] < loads[best] || (loads[index] == loads[best] && d < best_d)
                    }
                };
                if better {
                    chosen = Some((index, d));
                }
            }

            match chosen {
                Some((index, d)) => {
                    loads[index] += user.demand;
                    covered_demand += user.demand;
                    total_distance += d;
                }
                None => uncovered_users += 1,
            }
        }

        let pairs = pair_penalties(individual, self.coverage_radius);

        Fitness {
            covered_demand,
            total_distance,
            uncovered_users,
            channel_conflicts: pairs.channel_conflicts,
            physical_crowding: pairs.physical_crowding,
            coverage_overlap: pairs.coverage_overlap,
            capacity_penalty: capacity_penalty(&loads),
            loads,
        }
    }
}

impl Evaluator for CoverageEvaluator {
    fn fitness(&self, individual: &Individual) -> f64 {
        self.evaluate(individual).score()
    }
}
