use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Controls how long an optimization run keeps breeding generations.
///
/// The baseline is a fixed generation budget. Early stopping is opt-in: with a
/// `stagnation_limit` of `m`, the run also ends once `m` consecutive
/// generations pass without improving the best score.
///
/// # Examples
///
/// ```rust
/// use fx_wifi_ga::models::Schedule;
///
/// // 600 generations, no early stopping
/// let fixed = Schedule::generational(600);
///
/// // Stop early after 100 generations without improvement
/// let patient = Schedule::generational(600).with_stagnation_limit(100);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// Total number of generations evaluated before the run terminates.
    pub generations: u32,
    /// Consecutive non-improving generations tolerated before stopping early.
    pub stagnation_limit: Option<u32>,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Conclusion {
    /// The generation budget was spent.
    Exhausted,
    /// The best score did not improve for `stagnation_limit` generations.
    Stagnated,
}

/// Decision taken after each evaluated generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// Breed the next generation.
    Continue,
    /// Stop; the best result so far is final.
    Terminate(Conclusion),
}

/// Bookkeeping the schedule decides on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub generations_completed: u32,
    pub generations_since_improvement: u32,
}

impl Progress {
    /// Records one evaluated generation.
    pub(crate) fn record(&mut self, improved: bool) {
        self.generations_completed += 1;
        if improved {
            self.generations_since_improvement = 0;
        } else {
            self.generations_since_improvement += 1;
        }
    }
}

impl Schedule {
    pub fn generational(generations: u32) -> Self {
        Self {
            generations,
            stagnation_limit: None,
        }
    }

    pub fn with_stagnation_limit(mut self, limit: u32) -> Self {
        self.stagnation_limit = Some(limit);
        self
    }

    /// Determines whether to breed another generation.
    #[instrument(level = "debug", skip(self), fields(generations = self.generations, stagnation_limit = ?self.stagnation_limit))]
    pub(crate) fn decide(&self, progress: &Progress) -> ScheduleDecision {
        if progress.generations_completed >= self.generations {
            return ScheduleDecision::Terminate(Conclusion::Exhausted);
        }

        match self.stagnation_limit {
            Some(limit) if progress.generations_since_improvement >= limit => {
                ScheduleDecision::Terminate(Conclusion::Stagnated)
            }
            _ => ScheduleDecision::Continue,
        }
    }
}
