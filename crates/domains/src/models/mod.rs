//! # Domain Models
//!
//! These structs represent the core entities of the campus CMS.
//! Posts use UUID v4 identifiers; older records may still carry a legacy
//! string identifier (see [`PostLookup`]).

mod blocklist;
mod post;
mod session;

pub use blocklist::Blocklist;
pub use post::{Comment, NewPost, Post, PostIdentifier, PostLookup, PostPatch};
pub use session::{AdminAccount, Credential, Subject, SESSION_TTL_SECS};
