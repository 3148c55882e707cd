//! # api-adapters
//!
//! The HTTP routing and orchestration layer for the campus CMS.
//!
//! Handlers translate requests into service calls and map `DomainError`
//! kinds onto status codes; nothing below this crate knows about HTTP.
//! The web framework is selected at compile time (`web-axum`).

pub mod metrics;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod gate;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod session;
#[cfg(feature = "web-axum")]
pub mod state;

pub use metrics::Metrics;

#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use session::{AdminSession, SessionCookies, SessionPolicy};
#[cfg(feature = "web-axum")]
pub use state::{AppState, Ports};
