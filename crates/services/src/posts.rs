//! # Post management
//!
//! Admin CRUD over posts plus the public, visibility-filtered reads.

use std::sync::Arc;

use chrono::Utc;
use domains::{DomainError, DomainResult, NewPost, Post, PostLookup, PostPatch, PostRepository};
use tracing::info;
use uuid::Uuid;

pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn create(&self, new: NewPost) -> DomainResult<Post> {
        let post = Post::create(new, Utc::now())?;
        self.posts.insert(&post).await?;
        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    pub async fn list(&self, include_hidden: bool) -> DomainResult<Vec<Post>> {
        self.posts.list(include_hidden).await
    }

    /// Hidden posts only resolve when `include_hidden` is set.
    pub async fn get(&self, post_ref: &str, include_hidden: bool) -> DomainResult<Post> {
        let post = self.resolve(post_ref).await?;
        if !post.visible && !include_hidden {
            return Err(DomainError::not_found("post", post_ref));
        }
        Ok(post)
    }

    pub async fn update(&self, post_ref: &str, patch: PostPatch) -> DomainResult<Post> {
        let mut post = self.resolve(post_ref).await?;
        post.apply(patch, Utc::now())?;
        self.posts.update(&post).await?;
        info!(post_id = %post.id, "post updated");
        Ok(post)
    }

    pub async fn delete(&self, post_ref: &str) -> DomainResult<Uuid> {
        let post = self.resolve(post_ref).await?;
        if !self.posts.delete(post.id).await? {
            return Err(DomainError::not_found("post", post_ref));
        }
        info!(post_id = %post.id, "post deleted");
        Ok(post.id)
    }

    async fn resolve(&self, post_ref: &str) -> DomainResult<Post> {
        self.posts
            .find(&PostLookup::parse(post_ref))
            .await?
            .ok_or_else(|| DomainError::not_found("post", post_ref))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::MockPostRepository;

    fn draft(title: &str, visible: bool) -> NewPost {
        NewPost {
            title: title.into(),
            body: "İçerik".into(),
            legacy_id: None,
            visible,
            comments_allowed: true,
        }
    }

    #[tokio::test]
    async fn create_rejects_blank_title_without_writing() {
        let mut repo = MockPostRepository::new();
        repo.expect_insert().never();

        let err = PostService::new(Arc::new(repo))
            .create(draft("  ", true))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn hidden_post_is_not_found_for_public_reads() {
        let post = Post::create(draft("Gizli", false), Utc::now()).unwrap();
        let mut repo = MockPostRepository::new();
        repo.expect_find().returning(move |_| Ok(Some(post.clone())));
        let service = PostService::new(Arc::new(repo));

        assert!(matches!(
            service.get("x", false).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert_eq!(service.get("x", true).await.unwrap().title, "Gizli");
    }

    #[tokio::test]
    async fn update_persists_the_patched_post() {
        let post = Post::create(draft("Eski", true), Utc::now()).unwrap();
        let mut repo = MockPostRepository::new();
        repo.expect_find().returning(move |_| Ok(Some(post.clone())));
        repo.expect_update()
            .withf(|p| p.title == "Yeni" && !p.comments_allowed)
            .times(1)
            .returning(|_| Ok(()));

        let patch = PostPatch {
            title: Some("Yeni".into()),
            comments_allowed: Some(false),
            ..Default::default()
        };
        let updated = PostService::new(Arc::new(repo))
            .update("x", patch)
            .await
            .unwrap();
        assert_eq!(updated.title, "Yeni");
    }

    #[tokio::test]
    async fn delete_of_unknown_post_is_not_found() {
        let mut repo = MockPostRepository::new();
        repo.expect_find().returning(|_| Ok(None));
        repo.expect_delete().never();

        let err = PostService::new(Arc::new(repo))
            .delete("nope")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
