use super::Individual;

/// Objective function returning the fitness of a candidate placement.
/// Higher is better. Implementations are shared across the evaluation pool, so they must be `Sync`.
pub trait Evaluator: Sync {
    /// Must return a finite score; ranking panics on NaN or infinities.
    fn fitness(&self, individual: &Individual) -> f64;
}
