//! Partial match criteria for entity queries.

use crate::domain::foundation::{EntityId, Timestamp, UserId};

use super::Entity;

/// Subset of entity attributes to match against.
///
/// Each supplied field must equal the entity's attribute exactly; supplied
/// fields are AND-combined. Unset fields are ignored, so the empty criteria
/// matches every entity. Every repository adapter matches through
/// [`EntityCriteria::matches`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityCriteria {
    pub id: Option<EntityId>,
    pub owner_user_id: Option<UserId>,
    pub name: Option<String>,
    pub purpose: Option<String>,
    pub created_at: Option<Timestamp>,
}

impl EntityCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_owner(mut self, owner_user_id: UserId) -> Self {
        self.owner_user_id = Some(owner_user_id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_purpose(mut self, purpose: impl Into<String>) -> Self {
        self.purpose = Some(purpose.into());
        self
    }

    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns true if every supplied field equals the entity's attribute.
    pub fn matches(&self, entity: &Entity) -> bool {
        fn field_matches<T: PartialEq + ?Sized>(expected: Option<&T>, actual: &T) -> bool {
            expected.map_or(true, |value| value == actual)
        }

        field_matches(self.id.as_ref(), entity.id())
            && field_matches(self.owner_user_id.as_ref(), entity.owner_user_id())
            && field_matches(self.name.as_deref(), entity.name())
            && field_matches(self.purpose.as_deref(), entity.purpose())
            && field_matches(self.created_at.as_ref(), entity.created_at())
    }
}
