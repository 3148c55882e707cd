//! Request handlers, one module per resource.

pub mod auth;
pub mod blocklist;
pub mod comments;
pub mod health;
pub mod posts;
