//! The best placement found by a run, and the handles used to share it.
//!
//! The evolution loop is the only writer. It swaps in a whole new
//! [`BestResult`] behind one lock, so readers polling from other threads or
//! tasks always see a score together with the individual that earned it.

use super::Individual;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock};
use uuid::Uuid;

/// The highest scoring individual seen so far in a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestResult {
    pub(crate) request_id: Uuid,
    pub(crate) score: f64,
    pub(crate) generation: u32,
    pub(crate) individual: Individual,
    pub(crate) found_at: DateTime<Utc>,
}

impl BestResult {
    pub(crate) fn new(
        request_id: Uuid,
        score: f64,
        individual: Individual,
        generation: u32,
    ) -> Self {
        Self {
            request_id,
            score,
            generation,
            individual,
            found_at: Utc::now(),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Generation in which this individual was first ranked best.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn individual(&self) -> &Individual {
        &self.individual
    }

    pub fn found_at(&self) -> DateTime<Utc> {
        self.found_at
    }
}

type Slot = Arc<RwLock<Option<Arc<BestResult>>>>;

/// Write side, owned by the optimization service.
#[derive(Debug, Default)]
pub(crate) struct BestResultCell {
    slot: Slot,
}

impl BestResultCell {
    pub(crate) fn reader(&self) -> BestResultReader {
        BestResultReader {
            slot: Arc::clone(&self.slot),
        }
    }

    pub(crate) fn store(&self, best: Arc<BestResult>) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = Some(best);
    }

    pub(crate) fn clear(&self) {
        *self.slot.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

/// Read-only view of the best result, cheap to clone and safe to poll mid-run.
#[derive(Debug, Clone)]
pub struct BestResultReader {
    slot: Slot,
}

impl BestResultReader {
    /// The current best result, `None` before the first generation is ranked.
    pub fn snapshot(&self) -> Option<Arc<BestResult>> {
        self.slot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
