use thiserror::Error;

/// Errors surfaced by the estimation API.
///
/// Thresholds outside `1..=n` are not errors; they resolve to exact `0.0` / `1.0`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EstimationError {
    /// A trial parameter lies outside the `[0, 10000]` scale.
    #[error("trial parameter {value} at index {index} is outside [0, 10000]")]
    ParameterOutOfRange { index: usize, value: i64 },
    /// Input validation error.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The worker pool could not be created. Fatal for the run.
    #[error("worker pool unavailable: {0}")]
    WorkerPool(String),
    /// Configuration could not be encoded or decoded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for EstimationError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
