//! # DomainError
//!
//! Centralized error handling for the campus CMS.
//! Every service operation returns [`DomainResult`]; only the HTTP boundary
//! decides which status code a variant becomes.

use thiserror::Error;

/// The primary error type for all domain and service operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or missing input (e.g. blank title, unparsable index).
    #[error("validation error: {0}")]
    Validation(String),

    /// A free-text field was empty once trimmed.
    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    /// Resource not found (e.g. Post, admin account, blocklist term).
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// The post exists but does not accept comments.
    #[error("comments are disabled for this post")]
    CommentsDisabled,

    /// The comment contains a blocklisted term.
    #[error("comment contains forbidden content")]
    ForbiddenContent,

    /// Positional comment handle outside `[0, len)`.
    #[error("comment index {index} is out of range (post has {len} comments)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Resource already exists (e.g. duplicate blocklist term).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Bad credentials, or a missing / invalid / expired session token.
    #[error("unauthorized: {0}")]
    Auth(String),

    /// Infrastructure failure (e.g. database down, hashing failure).
    #[error("upstream failure: {0}")]
    Upstream(String),
}

impl DomainError {
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    pub fn upstream(err: impl std::fmt::Display) -> Self {
        Self::Upstream(err.to_string())
    }
}

/// A specialized Result type for campus CMS logic.
pub type DomainResult<T> = std::result::Result<T, DomainError>;
