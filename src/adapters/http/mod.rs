//! HTTP adapters - request handlers for the REST surface.

pub mod entity;

pub use entity::{add_entity, EntityHandlers};
