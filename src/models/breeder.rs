use crate::models::{Individual, Mutagen, Population, Scored, crossover};
use rand::Rng;
use tracing::instrument;

/// Builds generation `g + 1` from the ranked survivors of generation `g`.
pub(crate) struct Breeder<'a> {
    mutagen: &'a Mutagen,
    population_size: usize,
}

impl<'a> Breeder<'a> {
    pub(crate) fn new(mutagen: &'a Mutagen, population_size: usize) -> Self {
        Self {
            mutagen,
            population_size,
        }
    }

    fn breed_child<R: Rng>(
        &self,
        rng: &mut R,
        parent1: &Individual,
        parent2: &Individual,
    ) -> Individual {
        let child = crossover(rng, parent1, parent2);
        self.mutagen.mutate(rng, &child)
    }

    /// Survivors are carried over first, then children of uniformly drawn
    /// survivor pairs fill the population up to one short of its size, and the
    /// best individual ever seen takes the last slot.
    ///
    /// # Panics
    ///
    /// Panics if there are no survivors or they already fill `population_size`.
    #[instrument(level = "debug", skip(self, rng, survivors, best), fields(survivors = survivors.len(), population_size = self.population_size))]
    pub(crate) fn breed_generation<R: Rng>(
        &self,
        rng: &mut R,
        survivors: &[Scored],
        best: &Individual,
        next_generation: u32,
    ) -> Population {
        assert!(!survivors.is_empty(), "breeding requires at least one survivor");
        assert!(
            survivors.len() < self.population_size,
            "survivors must leave room for the best individual"
        );

        let mut individuals: Vec<Individual> = Vec::with_capacity(self.population_size);
        individuals.extend(survivors.iter().map(|s| s.individual.clone()));

        while individuals.len() < self.population_size - 1 {
            let a = rng.random_range(0..survivors.len());
            let b = rng.random_range(0..survivors.len());
            let child = self.breed_child(rng, &survivors[a].individual, &survivors[b].individual);
            individuals.push(child);
        }

        individuals.push(best.clone());

        Population::new(next_generation, individuals)
    }
}
