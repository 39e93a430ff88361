//! Error types for the cleaning and balancing pipeline

use thiserror::Error;

/// Result type alias for fraudprep operations
pub type Result<T> = std::result::Result<T, PrepError>;

/// Main error type for table transforms and class balancing
#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    #[error("Invalid target proportion {0}: must be finite and within [0, 1)")]
    InvalidProportion(f64),

    #[error("Cannot draw {requested} samples from empty class {class}")]
    EmptyClass { class: i64, requested: usize },

    #[error("Invalid label: {0}")]
    InvalidLabel(String),

    #[error("Column {column} is not numeric (dtype {dtype})")]
    NonNumericColumn { column: String, dtype: String },

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<polars::error::PolarsError> for PrepError {
    fn from(err: polars::error::PolarsError) -> Self {
        PrepError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PrepError {
    fn from(err: serde_json::Error) -> Self {
        PrepError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PrepError {
    fn from(err: ndarray::ShapeError) -> Self {
        PrepError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
