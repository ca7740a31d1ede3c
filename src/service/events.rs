use crate::models::Conclusion;
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle events emitted by an optimization run, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    // ============================================================
    // PopulationInitialized
    // ============================================================
    PopulationInitialized {
        request_id: Uuid,
        population_size: usize,
    },
    // ============================================================
    // GenerationEvaluated
    // ============================================================
    /// Emitted once per generation, after selection.
    GenerationEvaluated {
        request_id: Uuid,
        generation: u32,
        /// Best score within this generation.
        best_score: f64,
        mean_score: f64,
        /// Best score across all generations so far.
        best_ever_score: f64,
    },
    // ============================================================
    // BestImproved
    // ============================================================
    BestImproved {
        request_id: Uuid,
        generation: u32,
        score: f64,
    },
    // ============================================================
    // Concluded
    // ============================================================
    Concluded {
        request_id: Uuid,
        generations: u32,
        conclusion: Conclusion,
        best_score: f64,
    },
}

/// Receives events as a run progresses.
pub trait Publisher {
    fn publish(&mut self, event: &Event);
}

impl<F> Publisher for F
where
    F: FnMut(&Event),
{
    fn publish(&mut self, event: &Event) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopPublisher;

impl Publisher for NoopPublisher {
    fn publish(&mut self, _: &Event) {}
}
