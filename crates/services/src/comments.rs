//! # Comment moderation
//!
//! Accepts reader comments against a post and removes them by position.
//! Every operation here is public, so a hidden post reads as missing.
//!
//! Deletion is positional and read-modify-write: a delete computed against a
//! stale snapshot can remove the wrong comment if another append or delete
//! lands in between. Appends themselves are atomic in storage.

use std::sync::Arc;

use chrono::Utc;
use domains::{
    BlocklistRepository, Comment, DomainError, DomainResult, Post, PostLookup, PostRepository,
};
use tracing::{debug, info};

pub struct CommentService {
    posts: Arc<dyn PostRepository>,
    blocklist: Arc<dyn BlocklistRepository>,
}

impl CommentService {
    pub fn new(posts: Arc<dyn PostRepository>, blocklist: Arc<dyn BlocklistRepository>) -> Self {
        Self { posts, blocklist }
    }

    /// Moderates `raw_text` and appends it to the post's comments.
    ///
    /// Each check below is its own rejection and all of them run before any
    /// write, so a rejected comment never touches storage.
    pub async fn add_comment(&self, post_ref: &str, raw_text: &str) -> DomainResult<Vec<Comment>> {
        // 1. Normalize
        let text = raw_text.trim();
        if text.is_empty() {
            return Err(DomainError::EmptyInput { field: "comment" });
        }

        // 2. Resolve the post by either identifier form
        let post = self.resolve(post_ref).await?;

        // 3. Moderation gate
        if !post.comments_allowed {
            info!(post_id = %post.id, "comment rejected: comments disabled");
            return Err(DomainError::CommentsDisabled);
        }

        // 4. Blocklist
        let blocklist = self.blocklist.load().await?;
        if let Some(term) = blocklist.first_match(text) {
            info!(post_id = %post.id, "comment rejected: blocklisted content");
            debug!(post_id = %post.id, term, "blocklist match");
            return Err(DomainError::ForbiddenContent);
        }

        // 5. Persist
        let comment = Comment::new(text, Utc::now());
        let comments = self.posts.append_comment(post.id, &comment).await?;
        info!(post_id = %post.id, count = comments.len(), "comment added");
        Ok(comments)
    }

    /// Removes the comment at `index`, shifting later ones down.
    pub async fn delete_comment(&self, post_ref: &str, index: usize) -> DomainResult<Vec<Comment>> {
        let post = self.resolve(post_ref).await?;

        let mut comments = post.comments;
        if index >= comments.len() {
            return Err(DomainError::IndexOutOfRange {
                index,
                len: comments.len(),
            });
        }
        comments.remove(index);

        let comments = self.posts.replace_comments(post.id, &comments).await?;
        info!(post_id = %post.id, index, "comment deleted");
        Ok(comments)
    }

    pub async fn list_comments(&self, post_ref: &str) -> DomainResult<Vec<Comment>> {
        Ok(self.resolve(post_ref).await?.comments)
    }

    async fn resolve(&self, post_ref: &str) -> DomainResult<Post> {
        let lookup = PostLookup::parse(post_ref);
        match self.posts.find(&lookup).await? {
            Some(post) if post.visible => Ok(post),
            Some(post) => {
                debug!(post_id = %post.id, "hidden post treated as missing");
                Err(DomainError::not_found("post", lookup.to_string()))
            }
            None => Err(DomainError::not_found("post", lookup.to_string())),
        }
    }
}
