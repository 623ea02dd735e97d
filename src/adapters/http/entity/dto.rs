//! HTTP DTOs for entity endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing independent evolution.

use serde::{Deserialize, Serialize};

use crate::application::AddNewEntityCommand;
use crate::domain::entity::Entity;
use crate::domain::foundation::{DomainError, UserId};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to register an entity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntityRequest {
    pub user_id: String,
    pub name: String,
    pub purpose: String,
}

impl AddEntityRequest {
    /// Parse a raw request body.
    ///
    /// Any body that is not a complete request is a plain `BadRequest`.
    pub fn parse(body: &[u8]) -> Result<Self, DomainError> {
        serde_json::from_slice(body).map_err(|_| DomainError::bad_request())
    }

    /// Convert into a command, rejecting empty identifiers.
    pub fn into_command(self) -> Result<AddNewEntityCommand, DomainError> {
        let requested_by_user_id = UserId::new(self.user_id)
            .map_err(|_| DomainError::validating("userId", "cannot be empty"))?;
        if self.name.is_empty() {
            return Err(DomainError::validating("name", "cannot be empty"));
        }
        Ok(AddNewEntityCommand {
            requested_by_user_id,
            entity_name: self.name,
            entity_purpose: self.purpose,
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Response after an entity was registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityCreatedResponse {
    pub id: String,
}

impl From<&Entity> for EntityCreatedResponse {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id().to_string(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn internal() -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: "Internal server error".to_string(),
        }
    }
}

impl From<&DomainError> for ErrorResponse {
    fn from(err: &DomainError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.message(),
        }
    }
}
