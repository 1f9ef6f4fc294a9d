//! Error types for the benchmarking harness

use thiserror::Error;

/// Result type alias for benchmark operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed row {row}: expected {expected} columns, got {actual}")]
    MalformedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Cannot parse '{value}' as a number (row {row}, column {column})")]
    ParseFailure {
        row: usize,
        column: usize,
        value: String,
    },

    #[error("Invalid parameter: {name} = {value}, {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Model not fitted")]
    ModelNotFitted,
}

impl BenchError {
    /// Shorthand for an [`BenchError::InvalidParameter`]
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        BenchError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for BenchError {
    fn from(err: polars::error::PolarsError) -> Self {
        BenchError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        BenchError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for BenchError {
    fn from(err: ndarray::ShapeError) -> Self {
        BenchError::DataError(format!("invalid matrix shape: {}", err))
    }
}

impl From<rayon::ThreadPoolBuildError> for BenchError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        BenchError::ThreadPoolError(err.to_string())
    }
}
