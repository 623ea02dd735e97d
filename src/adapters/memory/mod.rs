//! In-memory persistence adapters.
//!
//! Disposable stand-ins for a real store, used by tests and by the default
//! composition root.

mod entity_repository;
mod user_repository;

pub use entity_repository::InMemoryEntityRepository;
pub use user_repository::InMemoryUserRepository;
