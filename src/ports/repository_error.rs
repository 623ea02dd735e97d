//! Infrastructure errors raised by repository adapters.
//!
//! These never cross the application boundary as-is: handlers either
//! translate them into a `DomainError` or report them as opaque failures.

use thiserror::Error;

/// Errors that can occur inside a persistence adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("Record \"{record_name}\" not found with \"{property}\": \"{value}\"")]
    RecordNotFound {
        record_name: String,
        property: String,
        value: String,
    },

    #[error("Unique constraint on \"{record_name}\" violated by {key}")]
    UniqueViolation { record_name: String, key: String },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl RepositoryError {
    /// Creates a not-found error describing the lookup that failed.
    pub fn not_found_by(
        record_name: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        RepositoryError::RecordNotFound {
            record_name: record_name.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    pub fn unique_violation(record_name: impl Into<String>, key: impl Into<String>) -> Self {
        RepositoryError::UniqueViolation {
            record_name: record_name.into(),
            key: key.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        RepositoryError::Storage(message.into())
    }
}
