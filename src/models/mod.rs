mod access_point;
mod best;
mod breeder;
mod crossover;
mod evaluator;
mod fitness;
mod geometry;
mod individual;
mod mutagen;
mod population;
mod request;
mod schedule;
mod user;

pub use access_point::{AccessPoint, MAX_CHANNEL, MIN_CHANNEL};
pub use best::{BestResult, BestResultReader};
pub use crossover::{crossover, crossover_at};
pub use evaluator::Evaluator;
pub use fitness::{
    AP_CAPACITY, CHANNEL_REUSE_FACTOR, CoverageEvaluator, Fitness, MIN_SEPARATION, OVERLAP_FACTOR,
    capacity_penalty,
};
pub use geometry::{Point, distance};
pub use individual::Individual;
pub use mutagen::{Mutagen, MutationRate, MutationRateOutOfRange};
pub use population::{Population, Ranking, Scored};
pub use request::{
    DEFAULT_AREA_SIZE, DEFAULT_ELITISM_COUNT, DEFAULT_GENERATIONS, DEFAULT_MUTATION_RATE,
    DEFAULT_POPULATION_SIZE, Request, RequestValidationError,
};
pub use schedule::{Conclusion, Progress, Schedule, ScheduleDecision};
pub use user::{
    DEMAND_LEVELS, DEMAND_WEIGHTS, User, UserParseError, load_users, mean_demand, parse_users,
    synthesize_users,
};

pub(crate) use best::BestResultCell;
pub(crate) use breeder::Breeder;
