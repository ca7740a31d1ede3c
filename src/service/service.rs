use super::Error;
use super::ServiceBuilder;
use super::events::{Event, NoopPublisher, Publisher};
use crate::models::{
    BestResult, BestResultCell, BestResultReader, Breeder, CoverageEvaluator, Evaluator,
    Population, Progress, Request, Schedule, ScheduleDecision, User,
};
use rand::{Rng, SeedableRng, rngs::StdRng};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::instrument;

// optimization service
pub struct Service {
    pub(super) users: Arc<[User]>,
    pub(super) best: BestResultCell,
    pub(super) log_interval: u32,
    /// Held for a whole run; the best-result cell has one writer at a time.
    pub(super) running: Mutex<()>,
}

impl Service {
    pub fn builder(users: Vec<User>) -> ServiceBuilder {
        ServiceBuilder::new(users)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Read handle on the best result of the current (or last) run.
    pub fn best_result(&self) -> BestResultReader {
        self.best.reader()
    }

    /// Runs a request, seeding the random source from the request or the OS.
    #[instrument(level = "info", skip(self, request), fields(request_id = %request.id, seeded = request.seed.is_some()))]
    pub fn optimize(&self, request: &Request) -> Result<Arc<BestResult>, Error> {
        let mut rng = match request.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        self.optimize_with(request, &mut rng, &mut NoopPublisher)
    }

    /// Runs a request against the service's users with an injected random source.
    pub fn optimize_with<R, P>(
        &self,
        request: &Request,
        rng: &mut R,
        publisher: &mut P,
    ) -> Result<Arc<BestResult>, Error>
    where
        R: Rng,
        P: Publisher,
    {
        let evaluator = CoverageEvaluator::new(Arc::clone(&self.users), request.coverage_radius);
        self.evolve(request, &evaluator, rng, publisher)
    }

    /// Evolves a population under `evaluator` until the schedule terminates.
    ///
    /// Each generation is evaluated in parallel, ranked, and bred into the
    /// next. The best result is swapped in only after a generation's
    /// evaluations have all completed, so readers never observe a partial update.
    /// Runs on the same service are serialized: a second call blocks until the
    /// first one concludes.
    #[instrument(level = "info", skip(self, request, evaluator, rng, publisher), fields(request_id = %request.id, ap_count = request.ap_count, population_size = request.population_size))]
    pub fn evolve<E, R, P>(
        &self,
        request: &Request,
        evaluator: &E,
        rng: &mut R,
        publisher: &mut P,
    ) -> Result<Arc<BestResult>, Error>
    where
        E: Evaluator + ?Sized,
        R: Rng,
        P: Publisher,
    {
        self.validate(request)?;
        let mutagen = request.mutagen()?;
        let breeder = Breeder::new(&mutagen, request.population_size);

        let _running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        self.best.clear();

        tracing::info!(
            users = self.users.len(),
            generations = request.schedule.generations,
            coverage_radius = request.coverage_radius,
            "Starting optimization"
        );

        let mut population = Population::random(
            rng,
            request.population_size,
            request.ap_count,
            request.area_size,
        );
        publisher.publish(&Event::PopulationInitialized {
            request_id: request.id,
            population_size: population.len(),
        });

        let mut progress = Progress::default();
        let mut best_so_far: Option<Arc<BestResult>> = None;

        let (best, conclusion) = loop {
            let ranking = population.evaluate(evaluator);
            let generation = ranking.generation();
            let Some(leader) = ranking.best() else {
                unreachable!("validated populations hold at least two individuals");
            };

            let (current, improved) = match best_so_far.take() {
                Some(previous) if previous.score >= leader.score => (previous, false),
                _ => {
                    let result = BestResult::new(
                        request.id,
                        leader.score,
                        leader.individual.clone(),
                        generation,
                    );
                    (Arc::new(result), true)
                }
            };

            if improved {
                self.best.store(Arc::clone(&current));
                tracing::debug!(generation, score = current.score, "Best placement improved");
                publisher.publish(&Event::BestImproved {
                    request_id: request.id,
                    generation,
                    score: current.score,
                });
            }

            progress.record(improved);
            let mean_score = ranking.mean_score();
            publisher.publish(&Event::GenerationEvaluated {
                request_id: request.id,
                generation,
                best_score: leader.score,
                mean_score,
                best_ever_score: current.score,
            });

            if self.log_interval > 0 && generation % self.log_interval == 0 {
                tracing::info!(
                    generation,
                    best_score = current.score,
                    mean_score,
                    "Generation evaluated"
                );
            }

            if let ScheduleDecision::Terminate(conclusion) = request.schedule.decide(&progress) {
                break (current, conclusion);
            }

            population = breeder.breed_generation(
                rng,
                ranking.survivors(request.elitism_count),
                &current.individual,
                generation + 1,
            );
            best_so_far = Some(current);
        };

        tracing::info!(
            generations = progress.generations_completed,
            ?conclusion,
            best_score = best.score,
            found_in_generation = best.generation,
            "Optimization concluded"
        );
        publisher.publish(&Event::Concluded {
            request_id: request.id,
            generations: progress.generations_completed,
            conclusion,
            best_score: best.score,
        });

        Ok(best)
    }

    fn validate(&self, request: &Request) -> Result<(), Error> {
        request.validate()?;

        for (index, user) in self.users.iter().enumerate() {
            if !(user.demand.is_finite() && user.demand > 0.0) {
                return Err(Error::InvalidUser {
                    index,
                    demand: user.demand,
                });
            }
            if !user.position.is_within(request.area_size) {
                return Err(Error::UserOutOfArea {
                    index,
                    position: user.position,
                    area_size: request.area_size,
                });
            }
        }

        Ok(())
    }
}

/// Runs one optimization over `users` and returns the best placement found.
///
/// The random source is seeded from the OS; use [`Service::optimize`] with
/// [`Request::with_seed`] for reproducible runs.
#[allow(clippy::too_many_arguments)]
pub fn run(
    users: Vec<User>,
    ap_count: usize,
    area_size: i32,
    coverage_radius: f64,
    population_size: usize,
    generations: u32,
    elitism_count: usize,
    mutation_rate: f64,
) -> Result<BestResult, Error> {
    let request = Request::new(ap_count, coverage_radius)
        .with_area_size(area_size)
        .with_population(population_size, elitism_count)
        .with_schedule(Schedule::generational(generations))
        .with_mutation_rate(mutation_rate);

    let service = Service::builder(users).build();
    let best = service.optimize(&request)?;

    Ok(Arc::unwrap_or_clone(best))
}
