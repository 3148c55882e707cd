use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifetime of a session credential, and of the cookie carrying it.
pub const SESSION_TTL_SECS: i64 = 600;

/// The identity a session credential vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: Uuid,
    pub username: String,
}

/// A freshly minted, signed session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub token: String,
    pub subject: Subject,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// The single administrator. `password_hash` is a PHC string (Argon2id).
#[derive(Clone, PartialEq, Eq)]
pub struct AdminAccount {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
}

impl AdminAccount {
    pub fn subject(&self) -> Subject {
        Subject {
            id: self.id,
            username: self.username.clone(),
        }
    }
}

// Keep the hash out of logs.
impl fmt::Debug for AdminAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminAccount")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password_hash", &"<redacted>")
            .finish()
    }
}
