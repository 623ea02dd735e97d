//! HTTP adapter for entity endpoints.
//!
//! Parses the raw body, invokes the registration handler and maps its
//! outcome to a status code. Routing and serving are left to the host
//! application.

mod dto;
mod handlers;

pub use dto::{AddEntityRequest, EntityCreatedResponse, ErrorResponse};
pub use handlers::{add_entity, EntityHandlers};
