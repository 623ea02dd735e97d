//! Entity command handlers.

mod add_new_entity;

pub use add_new_entity::{
    AddNewEntityCommand, AddNewEntityError, AddNewEntityHandler, REQUESTED_BY_USER_ID,
};
