//! Error types for the normform library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for normform operations.
#[derive(Debug, Error)]
pub enum NormformError {
    /// A required input was not supplied to an operation.
    ///
    /// This is a caller contract violation, never a data-quality issue.
    #[error("Missing input for '{dataset}': {what}")]
    MissingInput { dataset: String, what: String },

    /// The data source could not produce a well-formed table.
    #[error("Malformed data in '{dataset}': {message}")]
    MalformedData { dataset: String, message: String },

    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no columns to analyze.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl NormformError {
    /// Shorthand for a [`NormformError::MissingInput`].
    pub fn missing_input(dataset: impl Into<String>, what: impl Into<String>) -> Self {
        NormformError::MissingInput {
            dataset: dataset.into(),
            what: what.into(),
        }
    }

    /// Shorthand for a [`NormformError::MalformedData`].
    pub fn malformed(dataset: impl Into<String>, message: impl Into<String>) -> Self {
        NormformError::MalformedData {
            dataset: dataset.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for normform operations.
pub type Result<T> = std::result::Result<T, NormformError>;
