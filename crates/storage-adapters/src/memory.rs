//! # In-memory store
//!
//! DashMap-backed implementation of every persistence port. State lives for
//! the lifetime of the value; nothing is written to disk.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{
    AdminAccount, AdminRepository, Blocklist, BlocklistRepository, Comment, DomainError,
    DomainResult, Post, PostIdentifier, PostLookup, PostRepository,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryStore {
    posts: DashMap<Uuid, Post>,
    blocklist: RwLock<Blocklist>,
    admin: RwLock<Option<AdminAccount>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blocklist(self, blocklist: Blocklist) -> Self {
        Self {
            blocklist: RwLock::new(blocklist),
            ..self
        }
    }

    pub fn with_admin(self, admin: AdminAccount) -> Self {
        Self {
            admin: RwLock::new(Some(admin)),
            ..self
        }
    }

    pub fn with_posts(self, posts: impl IntoIterator<Item = Post>) -> Self {
        for post in posts {
            self.posts.insert(post.id, post);
        }
        self
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn find(&self, lookup: &PostLookup) -> DomainResult<Option<Post>> {
        // Native id first; it is the primary key.
        if let Some(id) = lookup.native() {
            if let Some(post) = self.posts.get(&id) {
                return Ok(Some(post.clone()));
            }
        }
        let legacy = PostIdentifier::Legacy(lookup.legacy().to_string());
        Ok(self
            .posts
            .iter()
            .find(|entry| entry.value().is_identified_by(&legacy))
            .map(|entry| entry.value().clone()))
    }

    async fn list(&self, include_hidden: bool) -> DomainResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|entry| include_hidden || entry.value().visible)
            .map(|entry| entry.value().clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn insert(&self, post: &Post) -> DomainResult<()> {
        if let Some(legacy) = &post.legacy_id {
            let taken = self
                .posts
                .iter()
                .any(|entry| entry.value().legacy_id.as_ref() == Some(legacy));
            if taken {
                return Err(DomainError::Conflict(format!(
                    "legacy id '{legacy}' is already in use"
                )));
            }
        }
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> DomainResult<()> {
        let mut stored = self
            .posts
            .get_mut(&post.id)
            .ok_or_else(|| DomainError::not_found("post", post.id.to_string()))?;
        stored.title = post.title.clone();
        stored.body = post.body.clone();
        stored.visible = post.visible;
        stored.comments_allowed = post.comments_allowed;
        stored.updated_at = post.updated_at;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.posts.remove(&id).is_some())
    }

    async fn append_comment(&self, post_id: Uuid, comment: &Comment) -> DomainResult<Vec<Comment>> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| DomainError::not_found("post", post_id.to_string()))?;
        post.comments.push(comment.clone());
        Ok(post.comments.clone())
    }

    async fn replace_comments(
        &self,
        post_id: Uuid,
        comments: &[Comment],
    ) -> DomainResult<Vec<Comment>> {
        let mut post = self
            .posts
            .get_mut(&post_id)
            .ok_or_else(|| DomainError::not_found("post", post_id.to_string()))?;
        post.comments = comments.to_vec();
        Ok(post.comments.clone())
    }
}

#[async_trait]
impl BlocklistRepository for InMemoryStore {
    async fn load(&self) -> DomainResult<Blocklist> {
        Ok(self.blocklist.read().await.clone())
    }

    async fn save(&self, blocklist: &Blocklist) -> DomainResult<()> {
        *self.blocklist.write().await = blocklist.clone();
        Ok(())
    }
}

#[async_trait]
impl AdminRepository for InMemoryStore {
    async fn find_admin(&self) -> DomainResult<Option<AdminAccount>> {
        Ok(self.admin.read().await.clone())
    }

    async fn upsert_admin(&self, admin: &AdminAccount) -> DomainResult<()> {
        let mut slot = self.admin.write().await;
        let id = slot.as_ref().map_or(admin.id, |existing| existing.id);
        *slot = Some(AdminAccount {
            id,
            ..admin.clone()
        });
        Ok(())
    }
}
