//! User domain module.
//!
//! Users are owned by an external user management subsystem. This crate
//! only reads them to decide whether a requester may register entities.

use crate::domain::foundation::UserId;
use serde::{Deserialize, Serialize};

/// Read-only view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    active: bool,
}

impl User {
    pub fn new(id: UserId, active: bool) -> Self {
        Self { id, active }
    }

    /// Convenience constructor for an active user.
    pub fn active(id: UserId) -> Self {
        Self::new(id, true)
    }

    /// Convenience constructor for an inactive user.
    pub fn inactive(id: UserId) -> Self {
        Self::new(id, false)
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Whether the user may create entities.
    pub fn is_active(&self) -> bool {
        self.active
    }
}
