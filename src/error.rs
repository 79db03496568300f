//! Custom error types for the treasury dashboard
//!
//! Fatal errors abort a request and are returned through [`TreasuryResult`].
//! Recoverable data problems (cycles, bad recurrence rules, ...) are not errors
//! at this level; they are collected as [`crate::engine::Diagnostic`] values
//! alongside the report.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for treasury operations
#[derive(Error, Debug)]
pub enum TreasuryError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid caller input (dates, identifiers, formats)
    #[error("Validation error: {0}")]
    Validation(String),

    /// The report window does not contain a single day
    #[error("Empty report window: {to} is not after {from}")]
    EmptyWindow { from: NaiveDate, to: NaiveDate },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Snapshot import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TreasuryError {
    /// Create a "not found" error for companies
    pub fn company_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Company",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the caller passed a window with no days in it
    pub fn is_empty_window(&self) -> bool {
        matches!(self, Self::EmptyWindow { .. })
    }
}

impl From<std::io::Error> for TreasuryError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TreasuryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for TreasuryError {
    fn from(err: csv::Error) -> Self {
        Self::Export(err.to_string())
    }
}

/// Result type alias for treasury operations
pub type TreasuryResult<T> = Result<T, TreasuryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TreasuryError::Config("test error".into());
        assert_eq!(err.to_string(), "Configuration error: test error");
    }

    #[test]
    fn test_not_found_error() {
        let err = TreasuryError::company_not_found("Acme");
        assert_eq!(err.to_string(), "Company not found: Acme");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_empty_window_error() {
        let err = TreasuryError::EmptyWindow {
            from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "Empty report window: 2024-02-01 is not after 2024-03-01"
        );
        assert!(err.is_empty_window());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TreasuryError = io_err.into();
        assert!(matches!(err, TreasuryError::Io(_)));
    }
}
