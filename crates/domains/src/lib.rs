//! # domains
//!
//! Entities, identifiers and port traits for the campus CMS.
//! Nothing in this crate performs I/O: adapters implement the traits in
//! [`ports`] and services orchestrate them.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
pub use models::*;
pub use ports::*;
