//! # Ports
//!
//! Any adapter must implement these traits to be wired in by the binary.
//! Services only ever see `Arc<dyn Trait>`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::DomainResult;
use crate::models::{AdminAccount, Blocklist, Comment, Credential, Post, PostLookup, Subject};

/// Persistence contract for posts and their comment sequences.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Finds the post matching either identifier form held by `lookup`.
    async fn find(&self, lookup: &PostLookup) -> DomainResult<Option<Post>>;

    /// Newest first. Hidden posts are skipped unless `include_hidden`.
    async fn list(&self, include_hidden: bool) -> DomainResult<Vec<Post>>;

    async fn insert(&self, post: &Post) -> DomainResult<()>;

    /// Persists title, body, flags and `updated_at`. Comments are not written.
    async fn update(&self, post: &Post) -> DomainResult<()>;

    /// Returns `false` when no post had this id.
    async fn delete(&self, id: Uuid) -> DomainResult<bool>;

    /// Atomically appends one comment and returns the updated sequence.
    async fn append_comment(&self, post_id: Uuid, comment: &Comment) -> DomainResult<Vec<Comment>>;

    /// Overwrites the whole comment sequence and returns it.
    async fn replace_comments(
        &self,
        post_id: Uuid,
        comments: &[Comment],
    ) -> DomainResult<Vec<Comment>>;
}

/// Persistence contract for the single blocklist record.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait BlocklistRepository: Send + Sync {
    /// An absent record reads as an empty blocklist.
    async fn load(&self) -> DomainResult<Blocklist>;
    async fn save(&self, blocklist: &Blocklist) -> DomainResult<()>;
}

/// Lookup of the single administrator account.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn find_admin(&self) -> DomainResult<Option<AdminAccount>>;

    /// Creates the admin, or replaces username and hash of the existing one.
    async fn upsert_admin(&self, admin: &AdminAccount) -> DomainResult<()>;
}

/// Salted password hash verification.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PasswordVerifier: Send + Sync {
    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool>;
}

/// Signed, time-limited session credentials.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait SessionTokens: Send + Sync {
    /// Mints a credential valid for [`crate::SESSION_TTL_SECS`] from `issued_at`.
    fn issue_at(&self, subject: &Subject, issued_at: DateTime<Utc>) -> DomainResult<Credential>;

    /// Returns the subject, or `DomainError::Auth` for any invalid or expired token.
    fn verify(&self, token: &str) -> DomainResult<Subject>;

    fn issue(&self, subject: &Subject) -> DomainResult<Credential> {
        self.issue_at(subject, Utc::now())
    }
}
