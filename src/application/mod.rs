//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Handlers receive their ports from the caller and never build adapters.

pub mod handlers;

pub use handlers::{AddNewEntityCommand, AddNewEntityError, AddNewEntityHandler};
