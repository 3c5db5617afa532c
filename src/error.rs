use thiserror::Error;

//errors reported by the engine before any computation starts
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BacktestError {
    #[error("Insufficient data: {required} bars required, {available} available")]
    InsufficientData { required: usize, available: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Invalid input record at index {index}: {reason}")]
    InvalidInputRecord { index: usize, reason: String },
}

impl BacktestError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        BacktestError::InvalidConfiguration(msg.into())
    }

    pub(crate) fn record(index: usize, reason: impl Into<String>) -> Self {
        BacktestError::InvalidInputRecord {
            index,
            reason: reason.into(),
        }
    }
}
