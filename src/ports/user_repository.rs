//! User lookup port.
//!
//! Read-only access to users owned by the user management subsystem.

use crate::domain::foundation::UserId;
use crate::domain::user::User;
use async_trait::async_trait;

use super::RepositoryError;

/// Port for resolving users by identifier.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by its identifier.
    ///
    /// Never returns an absent value: a missing user is reported through
    /// the error channel.
    ///
    /// # Errors
    ///
    /// - `RecordNotFound` if no user has this id
    /// - `Storage` on adapter failure
    async fn get_by_id(&self, id: &UserId) -> Result<User, RepositoryError>;
}
