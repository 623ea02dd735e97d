//! Error types for the domain layer.
//!
//! `DomainError` is the closed set of business-rule violations that may be
//! shown to a caller. Storage faults live in `ports::RepositoryError` and are
//! translated by the application layer before they reach a caller.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }
}

/// Stable kind of a domain error, safe to expose to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    BadRequest,
    DuplicateEntity,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::DuplicateEntity => "DUPLICATE_ENTITY",
        };
        write!(f, "{}", s)
    }
}

/// Business-rule violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// The request could not be understood at all.
    #[error("Bad request received")]
    BadRequest,

    /// A named property of the request failed validation.
    #[error("Bad request received while validating \"{property}\": {reason}")]
    InvalidProperty { property: String, reason: String },

    /// An entity with the same owner and name already exists.
    #[error("Duplicate record found: {name}")]
    DuplicateEntity { name: String },
}

impl DomainError {
    /// Creates an error for a request that could not be parsed.
    pub fn bad_request() -> Self {
        DomainError::BadRequest
    }

    /// Creates an error for a property that failed validation.
    pub fn validating(property: impl Into<String>, reason: impl Into<String>) -> Self {
        DomainError::InvalidProperty {
            property: property.into(),
            reason: reason.into(),
        }
    }

    /// Creates a duplicate error naming the conflicting entity.
    pub fn duplicate_entity(name: impl Into<String>) -> Self {
        DomainError::DuplicateEntity { name: name.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::BadRequest | DomainError::InvalidProperty { .. } => ErrorCode::BadRequest,
            DomainError::DuplicateEntity { .. } => ErrorCode::DuplicateEntity,
        }
    }

    /// Human-readable message for the caller.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyField { field } => {
                DomainError::validating(field, "cannot be empty")
            }
        }
    }
}
