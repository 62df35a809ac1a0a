//! Error types for the AgriHelp service.
//!
//! This module defines a unified error enum that covers all error categories
//! in the application: configuration, I/O, storage, knowledge lookup,
//! templates, the optional generator, and request validation.

use thiserror::Error;

/// Unified error type for the AgriHelp service.
///
/// All functions in the application return `Result<T, AppError>`.
/// We never panic — errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Storage backend errors (query cache, feedback tables)
    #[error("Store error: {0}")]
    Store(String),

    /// Knowledge snippet lookup errors
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Answer template errors
    #[error("Template error: {0}")]
    Template(String),

    /// Generative answer provider errors
    #[error("Generator error: {0}")]
    Generator(String),

    /// Request validation errors (reported to the caller, never logged as faults)
    #[error("{0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error came from validating caller input.
    ///
    /// Validation errors map to a 400 response; everything else is an
    /// internal fault.
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_is_flagged() {
        let err = AppError::Validation("Query cannot be empty".to_string());
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Query cannot be empty");
    }

    #[test]
    fn test_store_error_is_not_validation() {
        let err = AppError::Store("table missing".to_string());
        assert!(!err.is_validation());
    }
}
