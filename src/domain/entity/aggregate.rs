//! Owned entity value.

use std::hash::{Hash, Hasher};

use crate::domain::foundation::{EntityId, Timestamp, UserId};
use serde::{Deserialize, Serialize};

/// Full property set an entity is constructed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityProperties {
    pub id: EntityId,
    pub owner_user_id: UserId,
    pub name: String,
    pub purpose: String,
    pub created_at: Timestamp,
}

/// A record owned by a single user.
///
/// # Invariants
///
/// - All attributes are fixed at construction; there are no setters
/// - Equality and hashing use `id` only
///
/// No validation happens here. Callers construct entities only after the
/// registration rules have passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    properties: EntityProperties,
}

impl Entity {
    pub fn new(properties: EntityProperties) -> Self {
        Self { properties }
    }

    pub fn id(&self) -> &EntityId {
        &self.properties.id
    }

    pub fn owner_user_id(&self) -> &UserId {
        &self.properties.owner_user_id
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn purpose(&self) -> &str {
        &self.properties.purpose
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.properties.created_at
    }

    /// Read-only view of every attribute.
    pub fn properties(&self) -> &EntityProperties {
        &self.properties
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.properties.id == other.properties.id
    }
}

impl Eq for Entity {}

impl Hash for Entity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.properties.id.hash(state);
    }
}
