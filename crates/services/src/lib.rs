//! # services
//!
//! Business logic for the campus CMS: comment moderation, the admin session,
//! blocklist upkeep and post management. Each service receives its ports as
//! `Arc<dyn Trait>` from the entry point; none of them hold global state.

pub mod auth;
pub mod blocklist;
pub mod comments;
pub mod posts;

pub use auth::AuthService;
pub use blocklist::BlocklistService;
pub use comments::CommentService;
pub use posts::PostService;
