//! Entity domain module.
//!
//! An entity is a named record owned by a user. The type carries no
//! behaviour beyond construction; the rules for registering one live in
//! `application::handlers::entity`.

mod aggregate;
mod criteria;

pub use aggregate::{Entity, EntityProperties};
pub use criteria::EntityCriteria;
