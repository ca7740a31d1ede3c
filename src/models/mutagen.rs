use crate::models::access_point::random_channel;
use crate::models::{Individual, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::instrument;

// ============================================================
// MutationRate
// ============================================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MutationRate(f64);

#[derive(Debug, thiserror::Error)]
#[error("mutation_rate must be between 0.0 and 1.0, got: {0}")]
pub struct MutationRateOutOfRange(pub f64);

impl MutationRate {
    pub fn new(value: f64) -> Result<Self, MutationRateOutOfRange> {
        if !(0.0..=1.0).contains(&value) {
            return Err(MutationRateOutOfRange(value));
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

// ============================================================
// Mutagen
// ============================================================
/// Re-randomizes access point positions and channels with a fixed probability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mutagen {
    mutation_rate: MutationRate,
    area_size: i32,
}

impl Mutagen {
    pub fn new(mutation_rate: MutationRate, area_size: i32) -> Self {
        Self {
            mutation_rate,
            area_size,
        }
    }

    pub fn mutation_rate(&self) -> MutationRate {
        self.mutation_rate
    }

    /// Returns a mutated copy; the input is left untouched.
    ///
    /// Each access point independently gets a new position with probability
    /// `mutation_rate`, then independently a new channel with the same probability.
    #[instrument(level = "debug", skip(self, rng, individual), fields(ap_count = individual.len(), mutation_rate = self.mutation_rate.0))]
    pub fn mutate<R: Rng>(&self, rng: &mut R, individual: &Individual) -> Individual {
        let rate = self.mutation_rate.value();
        let mut access_points = individual.access_points().to_vec();

        for ap in access_points.iter_mut() {
            if rng.random_range(0.0..1.0) < rate {
                ap.position = Point::random(rng, self.area_size);
            }
            if rng.random_range(0.0..1.0) < rate {
                ap.channel = random_channel(rng);
            }
        }

        Individual::new(access_points)
    }
}
