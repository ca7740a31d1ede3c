use super::{MutationRate, MutationRateOutOfRange, Mutagen, Schedule};
use chrono::{DateTime, Utc};
use tracing::instrument;
use uuid::Uuid;

pub const DEFAULT_AREA_SIZE: i32 = 100;
pub const DEFAULT_POPULATION_SIZE: usize = 50;
pub const DEFAULT_ELITISM_COUNT: usize = 10;
pub const DEFAULT_GENERATIONS: u32 = 600;
pub const DEFAULT_MUTATION_RATE: f64 = 0.02;

/// Represents an optimization request with all genetic algorithm parameters.
/// Contains the complete configuration needed to run an optimization.
#[derive(Debug, Clone)]
pub struct Request {
    pub(crate) id: Uuid,
    pub(crate) requested_at: DateTime<Utc>,
    pub(crate) ap_count: usize,
    pub(crate) area_size: i32,
    pub(crate) coverage_radius: f64,
    pub(crate) population_size: usize,
    pub(crate) elitism_count: usize,
    pub(crate) mutation_rate: f64,
    pub(crate) schedule: Schedule,
    pub(crate) seed: Option<u64>,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RequestValidationError {
    #[error("InvalidApCount: ap_count must be at least 1, got {0}")]
    InvalidApCount(usize),
    #[error("InvalidAreaSize: area_size must be positive, got {0}")]
    InvalidAreaSize(i32),
    #[error("InvalidCoverageRadius: coverage_radius must be positive and finite, got {0}")]
    InvalidCoverageRadius(f64),
    #[error("InvalidElitismCount: elitism_count must be at least 1")]
    InvalidElitismCount,
    #[error(
        "PopulationTooSmall: population_size must be at least elitism_count + 1. population_size={population_size}, elitism_count={elitism_count}"
    )]
    PopulationTooSmall {
        population_size: usize,
        elitism_count: usize,
    },
    #[error("InvalidGenerations: at least one generation is required")]
    InvalidGenerations,
    #[error("InvalidStagnationLimit: stagnation_limit must be at least 1")]
    InvalidStagnationLimit,
    #[error("InvalidMutationRate: {0}")]
    InvalidMutationRate(f64),
}

impl From<MutationRateOutOfRange> for RequestValidationError {
    fn from(err: MutationRateOutOfRange) -> Self {
        Self::InvalidMutationRate(err.0)
    }
}

impl Request {
    /// Creates a request with the default area, population, schedule and mutation rate.
    pub fn new(ap_count: usize, coverage_radius: f64) -> Self {
        Self {
            id: Uuid::now_v7(),
            requested_at: Utc::now(),
            ap_count,
            area_size: DEFAULT_AREA_SIZE,
            coverage_radius,
            population_size: DEFAULT_POPULATION_SIZE,
            elitism_count: DEFAULT_ELITISM_COUNT,
            mutation_rate: DEFAULT_MUTATION_RATE,
            schedule: Schedule::generational(DEFAULT_GENERATIONS),
            seed: None,
        }
    }

    pub fn with_area_size(mut self, area_size: i32) -> Self {
        self.area_size = area_size;
        self
    }

    pub fn with_population(mut self, population_size: usize, elitism_count: usize) -> Self {
        self.population_size = population_size;
        self.elitism_count = elitism_count;
        self
    }

    pub fn with_schedule(mut self, schedule: Schedule) -> Self {
        self.schedule = schedule;
        self
    }

    pub fn with_mutation_rate(mut self, mutation_rate: f64) -> Self {
        self.mutation_rate = mutation_rate;
        self
    }

    /// Fixes the random source so the run is reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn requested_at(&self) -> DateTime<Utc> {
        self.requested_at
    }

    pub fn ap_count(&self) -> usize {
        self.ap_count
    }

    pub fn area_size(&self) -> i32 {
        self.area_size
    }

    pub fn coverage_radius(&self) -> f64 {
        self.coverage_radius
    }

    pub fn population_size(&self) -> usize {
        self.population_size
    }

    pub fn elitism_count(&self) -> usize {
        self.elitism_count
    }

    pub fn schedule(&self) -> Schedule {
        self.schedule
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Rejects parameters the evolution loop cannot run with. Nothing is clamped.
    #[instrument(level = "debug", skip(self), fields(request_id = %self.id))]
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.ap_count == 0 {
            return Err(RequestValidationError::InvalidApCount(self.ap_count));
        }

        if self.area_size <= 0 {
            return Err(RequestValidationError::InvalidAreaSize(self.area_size));
        }

        if !(self.coverage_radius.is_finite() && self.coverage_radius > 0.0) {
            return Err(RequestValidationError::InvalidCoverageRadius(
                self.coverage_radius,
            ));
        }

        if self.elitism_count == 0 {
            return Err(RequestValidationError::InvalidElitismCount);
        }

        if self.population_size < self.elitism_count + 1 {
            return Err(RequestValidationError::PopulationTooSmall {
                population_size: self.population_size,
                elitism_count: self.elitism_count,
            });
        }

        if self.schedule.generations == 0 {
            return Err(RequestValidationError::InvalidGenerations);
        }

        if self.schedule.stagnation_limit == Some(0) {
            return Err(RequestValidationError::InvalidStagnationLimit);
        }

        MutationRate::new(self.mutation_rate)?;

        Ok(())
    }

    /// The mutation operator for this request.
    pub(crate) fn mutagen(&self) -> Result<Mutagen, RequestValidationError> {
        Ok(Mutagen::new(
            MutationRate::new(self.mutation_rate)?,
            self.area_size,
        ))
    }
}
