//! Custom error types for checkbook-cli
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::Weight;

/// The main error type for checkbook-cli operations
#[derive(Error, Debug)]
pub enum CheckbookError {
    /// Budget weights do not add up to 1.00 (within tolerance)
    #[error("Invalid budget: weights sum to {sum}, expected 1.00")]
    InvalidBudget { sum: Weight },

    /// Non-positive or unparsable deposit/withdrawal amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Operation references a category absent from the current budget
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// The designated catch-all category is not one of the budget lines
    #[error("Catch-all category '{0}' is not part of the budget")]
    MissingCatchAll(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// A check register with the requested name already exists
    #[error("Check register already exists: {}", .0.display())]
    LedgerExists(PathBuf),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV reading/writing errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl CheckbookError {
    /// Create an "unknown category" error
    pub fn unknown_category(name: impl Into<String>) -> Self {
        Self::UnknownCategory(name.into())
    }

    /// Check if this is a locally-recoverable validation failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidBudget { .. }
                | Self::InvalidAmount(_)
                | Self::UnknownCategory(_)
                | Self::MissingCatchAll(_)
                | Self::Validation(_)
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for CheckbookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CheckbookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for CheckbookError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for checkbook-cli operations
pub type CheckbookResult<T> = Result<T, CheckbookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CheckbookError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_invalid_budget_reports_sum() {
        let err = CheckbookError::InvalidBudget {
            sum: Weight::from_ppm(950_000),
        };
        assert_eq!(
            err.to_string(),
            "Invalid budget: weights sum to 0.95, expected 1.00"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn test_unknown_category_error() {
        let err = CheckbookError::unknown_category("boats");
        assert_eq!(err.to_string(), "Unknown category: boats");
        assert!(err.is_validation());
    }

    #[test]
    fn test_storage_errors_are_not_validation() {
        assert!(!CheckbookError::Storage("disk full".into()).is_validation());
        assert!(!CheckbookError::LedgerExists(PathBuf::from("a.csv")).is_validation());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let checkbook_err: CheckbookError = io_err.into();
        assert!(matches!(checkbook_err, CheckbookError::Io(_)));
    }
}
