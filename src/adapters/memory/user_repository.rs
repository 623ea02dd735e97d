//! In-Memory User Repository Adapter
//!
//! Stand-in for the user management subsystem. Useful for tests and for
//! seeding users from configuration.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::domain::user::User;
use crate::ports::{RepositoryError, UserRepository};

/// In-memory user store keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with users
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users: HashMap<UserId, User> = users
            .into_iter()
            .map(|user| (user.id().clone(), user))
            .collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Number of stored users
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get_by_id(&self, id: &UserId) -> Result<User, RepositoryError> {
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::not_found_by("User", "id", id.as_str()))
    }
}
