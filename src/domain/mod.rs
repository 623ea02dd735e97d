//! Domain layer containing business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `entity` - Owned entity value and query criteria
//! - `user` - Read-only user view consumed from user management

pub mod entity;
pub mod foundation;
pub mod user;
