//! Composition root.
//!
//! Builds adapters and injects them into the application handlers. Nothing
//! below this module constructs its own dependencies.

use std::sync::Arc;

use crate::adapters::http::EntityHandlers;
use crate::adapters::memory::{InMemoryEntityRepository, InMemoryUserRepository};
use crate::application::AddNewEntityHandler;
use crate::config::RegistryConfig;
use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::user::User;

/// Wired registry backed by in-memory adapters.
pub struct Registry {
    pub users: Arc<InMemoryUserRepository>,
    pub entities: Arc<InMemoryEntityRepository>,
    pub add_new_entity: Arc<AddNewEntityHandler>,
}

impl Registry {
    /// Build an in-memory registry, seeding users from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if a configured user id is invalid.
    pub fn in_memory(config: &RegistryConfig) -> Result<Self, ValidationError> {
        let active = config
            .active_users_list()
            .into_iter()
            .map(|id| UserId::new(id).map(User::active));
        let inactive = config
            .inactive_users_list()
            .into_iter()
            .map(|id| UserId::new(id).map(User::inactive));
        let seed = active.chain(inactive).collect::<Result<Vec<_>, _>>()?;

        let users = Arc::new(InMemoryUserRepository::with_users(seed));
        let entities = Arc::new(InMemoryEntityRepository::new());
        let add_new_entity = Arc::new(AddNewEntityHandler::new(users.clone(), entities.clone()));

        tracing::debug!(
            active = config.active_users_list().len(),
            inactive = config.inactive_users_list().len(),
            "in-memory registry ready"
        );

        Ok(Self {
            users,
            entities,
            add_new_entity,
        })
    }

    /// State for the HTTP entity handlers.
    pub fn entity_handlers(&self) -> EntityHandlers {
        EntityHandlers::new(self.add_new_entity.clone())
    }
}
