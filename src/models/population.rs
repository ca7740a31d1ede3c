use super::{Evaluator, Individual};
use rand::Rng;
use rayon::prelude::*;
use tracing::instrument;

/// The individuals of one generation.
///
/// A population is never edited in place; breeding produces the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    generation: u32,
    individuals: Vec<Individual>,
}

impl Population {
    pub fn new(generation: u32, individuals: Vec<Individual>) -> Self {
        Self {
            generation,
            individuals,
        }
    }

    /// Generation zero: `size` independently drawn placements.
    #[instrument(level = "debug", skip(rng))]
    pub fn random<R: Rng>(rng: &mut R, size: usize, ap_count: usize, area_size: i32) -> Self {
        let individuals = (0..size)
            .map(|_| Individual::random(rng, ap_count, area_size))
            .collect();
        Self::new(0, individuals)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Scores every individual on the rayon pool and ranks them best first.
    ///
    /// Evaluations are independent; collecting them is the barrier before selection.
    #[instrument(level = "debug", skip(self, evaluator), fields(generation = self.generation, size = self.individuals.len()))]
    pub fn evaluate<E: Evaluator + ?Sized>(&self, evaluator: &E) -> Ranking {
        let scores: Vec<f64> = self
            .individuals
            .par_iter()
            .map(|individual| evaluator.fitness(individual))
            .collect();
        assert!(
            scores.iter().all(|score| score.is_finite()),
            "evaluator returned a non-finite score in generation {}",
            self.generation
        );

        let mut ranked: Vec<Scored> = self
            .individuals
            .iter()
            .cloned()
            .zip(scores)
            .map(|(individual, score)| Scored { individual, score })
            .collect();

        // Stable, so equal scores keep population order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        Ranking {
            generation: self.generation,
            ranked,
        }
    }
}

/// An individual paired with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct Scored {
    pub individual: Individual,
    pub score: f64,
}

/// A generation's individuals sorted by descending score.
#[derive(Debug, Clone)]
pub struct Ranking {
    generation: u32,
    ranked: Vec<Scored>,
}

impl Ranking {
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Highest scoring individual, `None` for an empty population.
    pub fn best(&self) -> Option<&Scored> {
        self.ranked.first()
    }

    /// The top `count` individuals (fewer if the population is smaller).
    pub fn survivors(&self, count: usize) -> &[Scored] {
        &self.ranked[..count.min(self.ranked.len())]
    }

    pub fn mean_score(&self) -> f64 {
        if self.ranked.is_empty() {
            return 0.0;
        }

        self.ranked.iter().map(|s| s.score).sum::<f64>() / self.ranked.len() as f64
    }

    pub fn ranked(&self) -> &[Scored] {
        &self.ranked
    }
}
