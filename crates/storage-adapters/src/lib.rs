//! # storage-adapters
//!
//! Implementations of the persistence ports in `domains`.
//!
//! - [`memory::InMemoryStore`]: always compiled; used by tests and local runs.
//! - [`postgres::PgStore`]: behind the `db-postgres` feature.

pub mod memory;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryStore;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;
