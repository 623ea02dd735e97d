//! Entity repository port.
//!
//! Defines the lookup and insert operations the registration use case
//! needs. Implementations may be backed by any store, but must keep the
//! same absent/failure semantics and match through `EntityCriteria::matches`
//! (exact equality per supplied field, AND-combined).

use crate::domain::entity::{Entity, EntityCriteria};
use async_trait::async_trait;

use super::RepositoryError;

/// Repository port for owned entities.
#[async_trait]
pub trait EntityRepository: Send + Sync {
    /// Find the first stored entity matching every supplied criterion.
    ///
    /// Returns `None` if nothing matches. This is a query, so no match is
    /// not an error.
    async fn find_first_by(
        &self,
        criteria: &EntityCriteria,
    ) -> Result<Option<Entity>, RepositoryError>;

    /// Store an entity keyed by its id and return the stored value.
    ///
    /// # Errors
    ///
    /// - `UniqueViolation` if the store enforces `(owner, name)` uniqueness
    /// - `Storage` on persistence failure
    async fn insert(&self, entity: Entity) -> Result<Entity, RepositoryError>;
}
