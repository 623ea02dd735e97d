//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory repositories and unit of work
//! - `http` - Request handler translating JSON bodies and outcomes

pub mod http;
pub mod memory;

pub use memory::{InMemoryEntityRepository, InMemoryUserRepository};
