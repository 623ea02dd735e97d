//! Registry configuration
//!
//! Seeds the in-memory user store, standing in for the user management
//! subsystem that owns users in a real deployment.

use serde::Deserialize;

use super::error::ValidationError;

/// Registry configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistryConfig {
    /// Active user ids (comma-separated)
    pub active_users: Option<String>,

    /// Inactive user ids (comma-separated)
    pub inactive_users: Option<String>,
}

impl RegistryConfig {
    /// Get active user ids as a vector
    pub fn active_users_list(&self) -> Vec<String> {
        split_list(self.active_users.as_deref())
    }

    /// Get inactive user ids as a vector
    pub fn inactive_users_list(&self) -> Vec<String> {
        split_list(self.inactive_users.as_deref())
    }

    /// Validate registry configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let active = self.active_users_list();
        match self
            .inactive_users_list()
            .into_iter()
            .find(|id| active.contains(id))
        {
            Some(id) => Err(ValidationError::ConflictingUser(id)),
            None => Ok(()),
        }
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}
