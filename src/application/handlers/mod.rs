//! Application handlers.
//!
//! Command handlers that orchestrate domain operations across ports.

pub mod entity;

pub use entity::{AddNewEntityCommand, AddNewEntityError, AddNewEntityHandler};
