use crate::models::passenger::PassengerFeatures;
use crate::models::prediction::Prediction;

/// Synchronous inference backend used by both prediction paths.
///
/// Implementations are called from the blocking thread pool and are
/// expected to return in bounded time. Nothing enforces that: a call that
/// never returns holds its worker for the rest of the process.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &PassengerFeatures) -> Result<Prediction, PredictionError>;

    /// Short identifier reported by the health check.
    fn name(&self) -> &str {
        "predictor"
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum PredictionError {
    #[error("Invalid feature vector: {0}")]
    InvalidFeatures(String),

    #[error("Model produced a non-finite score")]
    NonFiniteOutput,

    #[error("Prediction task aborted: {0}")]
    Aborted(String),
}
