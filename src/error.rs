//! Error types for the life grid
//!
//! The grid computation itself never fails; these errors are raised only at
//! the boundaries (parsing, validation, encoding).

use thiserror::Error;

/// Errors that can occur while turning raw input into a report
#[derive(Debug, Error)]
pub enum GridError {
    #[error("Failed to parse life parameters: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}
