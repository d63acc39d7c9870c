//! Custom error types for ledgerlink
//!
//! This module defines the error hierarchy for the engine using thiserror
//! for ergonomic error definitions.
//!
//! Row-level failures during an import (missing account, synthetic data,
//! persistence trouble) are never raised from batch calls; they are counted
//! in the batch summary. Only file-level or account-level conditions throw.

use thiserror::Error;

/// The main error type for ledgerlink operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for data models
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// No destination account was supplied and none could be resolved.
    /// Fatal before any persistence; the whole import call aborts.
    #[error("No destination account for import: {0}")]
    MissingDestinationAccount(String),

    /// The external parser failed or produced zero movements.
    /// Fatal for the whole file; no rows are ingested.
    #[error("Statement parse failure: {0}")]
    ParseFailure(String),

    /// A row matched the synthetic-data lexicon outside demo mode
    #[error("Synthetic data rejected: {0}")]
    SyntheticDataRejected(String),

    /// Import errors
    #[error("Import error: {0}")]
    Import(String),

    /// Reconciliation errors
    #[error("Reconciliation error: {0}")]
    Reconciliation(String),

    /// A versioned write lost the race against a concurrent writer
    #[error("Stale version for {entity_type} {identifier}: expected {expected}, found {found}")]
    StaleVersion {
        entity_type: &'static str,
        identifier: String,
        expected: u64,
        found: u64,
    },

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for movements
    pub fn movement_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Movement",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for obligations
    pub fn obligation_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Obligation",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error aborts a whole import call
    pub fn is_fatal_for_import(&self) -> bool {
        matches!(
            self,
            Self::MissingDestinationAccount(_) | Self::ParseFailure(_)
        )
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for ledgerlink operations
pub type LedgerResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LedgerError::ParseFailure("empty file".into());
        assert_eq!(err.to_string(), "Statement parse failure: empty file");
    }

    #[test]
    fn test_not_found_error() {
        let err = LedgerError::account_not_found("Checking");
        assert_eq!(err.to_string(), "Account not found: Checking");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_fatal_classification() {
        assert!(LedgerError::MissingDestinationAccount("x".into()).is_fatal_for_import());
        assert!(LedgerError::ParseFailure("x".into()).is_fatal_for_import());
        assert!(!LedgerError::SyntheticDataRejected("x".into()).is_fatal_for_import());
    }

    #[test]
    fn test_stale_version_display() {
        let err = LedgerError::StaleVersion {
            entity_type: "Movement",
            identifier: "abc".into(),
            expected: 1,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Stale version for Movement abc: expected 1, found 2"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let ledger_err: LedgerError = io_err.into();
        assert!(matches!(ledger_err, LedgerError::Io(_)));
    }
}
