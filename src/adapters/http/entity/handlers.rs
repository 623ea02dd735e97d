//! HTTP handlers for entity endpoints.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::{AddNewEntityError, AddNewEntityHandler};
use crate::domain::foundation::DomainError;

use super::dto::{AddEntityRequest, EntityCreatedResponse, ErrorResponse};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct EntityHandlers {
    add_new_entity: Arc<AddNewEntityHandler>,
}

impl EntityHandlers {
    pub fn new(add_new_entity: Arc<AddNewEntityHandler>) -> Self {
        Self { add_new_entity }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// Register a new entity from a JSON body.
///
/// - 201 with the new id on success
/// - 400 with code and message for any `DomainError`
/// - 500 with a generic body for anything else
pub async fn add_entity(State(handlers): State<EntityHandlers>, body: Bytes) -> Response {
    let cmd = match AddEntityRequest::parse(&body).and_then(AddEntityRequest::into_command) {
        Ok(cmd) => cmd,
        Err(e) => return domain_error_response(&e),
    };

    match handlers.add_new_entity.handle(cmd).await {
        Ok(entity) => (
            StatusCode::CREATED,
            Json(EntityCreatedResponse::from(&entity)),
        )
            .into_response(),
        Err(AddNewEntityError::Domain(e)) => domain_error_response(&e),
        Err(AddNewEntityError::Infrastructure(e)) => {
            tracing::error!(error = %e, "entity registration failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal()),
            )
                .into_response()
        }
    }
}

fn domain_error_response(error: &DomainError) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::from(error))).into_response()
}
