//! Entity Registry - register owned entities on behalf of users.
//!
//! The crate is laid out hexagonally: `domain` holds plain data and errors,
//! `ports` the persistence contracts, `application` the use-case handlers
//! that enforce the registration rules, and `adapters` the in-memory store
//! and the HTTP request handler. `bootstrap` wires them together.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
