//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `UserRepository` - Read-only user lookup
//! - `EntityRepository` - Entity query and insert
//! - `UnitOfWork` / `Transaction` - All-or-nothing scope around writes
//! - `RepositoryError` - Infrastructure failures raised by adapters

mod entity_repository;
mod repository_error;
mod unit_of_work;
mod user_repository;

pub use entity_repository::EntityRepository;
pub use repository_error::RepositoryError;
pub use unit_of_work::{Transaction, UnitOfWork};
pub use user_repository::UserRepository;
