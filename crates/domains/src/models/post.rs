use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// A single reader comment. Ordering within a post is insertion order and the
/// position in that sequence is the only handle used for deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(text: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            created_at,
        }
    }
}

/// A blog entry that owns its comment sequence and moderation flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    /// String identifier carried over from records created before UUIDs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_id: Option<String>,
    pub title: String,
    pub body: String,
    /// Whether the post is shown on the public site.
    pub visible: bool,
    /// Moderation gate: comments are rejected outright when false.
    pub comments_allowed: bool,
    #[serde(default)]
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Builds a fresh post with an empty comment list.
    pub fn create(new: NewPost, now: DateTime<Utc>) -> DomainResult<Self> {
        let title = require_title(&new.title)?;
        let legacy_id = new
            .legacy_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(Self {
            id: Uuid::new_v4(),
            legacy_id,
            title,
            body: new.body,
            visible: new.visible,
            comments_allowed: new.comments_allowed,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies an admin edit. Comments are never touched here.
    pub fn apply(&mut self, patch: PostPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(title) = patch.title {
            self.title = require_title(&title)?;
        }
        if let Some(body) = patch.body {
            self.body = body;
        }
        if let Some(visible) = patch.visible {
            self.visible = visible;
        }
        if let Some(allowed) = patch.comments_allowed {
            self.comments_allowed = allowed;
        }
        self.updated_at = now;
        Ok(())
    }

    pub fn is_identified_by(&self, identifier: &PostIdentifier) -> bool {
        match identifier {
            PostIdentifier::Native(id) => self.id == *id,
            PostIdentifier::Legacy(raw) => self.legacy_id.as_deref() == Some(raw.as_str()),
        }
    }

    /// True when any encoding held by `lookup` names this post.
    pub fn matches(&self, lookup: &PostLookup) -> bool {
        lookup.forms().iter().any(|form| self.is_identified_by(form))
    }
}

fn require_title(title: &str) -> DomainResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation("title must not be empty".into()));
    }
    Ok(title.to_string())
}

/// Admin input for a new post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub legacy_id: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub comments_allowed: bool,
}

fn default_true() -> bool {
    true
}

/// Partial admin edit; `None` leaves the field as it is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub visible: Option<bool>,
    pub comments_allowed: Option<bool>,
}

/// One encoding of a post's identity.
///
/// `Legacy` is a migration artifact: records imported before native ids
/// existed are still addressed by their old string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostIdentifier {
    Native(Uuid),
    Legacy(String),
}

/// A caller-supplied post identifier resolved into every form it may denote.
///
/// The raw string is always tried as a legacy id; it is additionally tried as
/// a native id when it parses as a UUID (hyphenated or simple). Storage
/// matches the two forms with a logical OR.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostLookup {
    native: Option<Uuid>,
    legacy: String,
}

impl PostLookup {
    pub fn parse(raw: &str) -> Self {
        Self {
            native: Uuid::parse_str(raw).ok(),
            legacy: raw.to_string(),
        }
    }

    pub fn native(&self) -> Option<Uuid> {
        self.native
    }

    pub fn legacy(&self) -> &str {
        &self.legacy
    }

    pub fn forms(&self) -> Vec<PostIdentifier> {
        let mut forms = Vec::with_capacity(2);
        if let Some(id) = self.native {
            forms.push(PostIdentifier::Native(id));
        }
        forms.push(PostIdentifier::Legacy(self.legacy.clone()));
        forms
    }
}

impl From<Uuid> for PostLookup {
    fn from(id: Uuid) -> Self {
        Self {
            native: Some(id),
            legacy: id.to_string(),
        }
    }
}

impl fmt::Display for PostLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.legacy)
    }
}
