//! Public comment endpoints for a single post.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::Json;
use domains::{Comment, DomainError};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Serialize)]
pub struct CommentsResponse {
    pub comments: Vec<Comment>,
}

/// `GET /blogs/{id}/comments`
pub async fn list(
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let comments = state.comments.list_comments(&post_ref).await?;
    Ok(Json(CommentsResponse { comments }))
}

/// `POST /blogs/{id}/comments`
pub async fn add(
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let Json(body) = payload?;

    let result = state.comments.add_comment(&post_ref, &body.comment).await;
    state.metrics.record_comment(&result);

    Ok(Json(CommentsResponse { comments: result? }))
}

/// `DELETE /blogs/{id}/comments/{index}`
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> Result<Json<CommentsResponse>, ApiError> {
    let Path((post_ref, raw_index)) = path?;
    let index = parse_index(&raw_index)?;

    let comments = state.comments.delete_comment(&post_ref, index).await?;
    Ok(Json(CommentsResponse { comments }))
}

fn parse_index(raw: &str) -> Result<usize, DomainError> {
    raw.parse::<usize>()
        .map_err(|_| DomainError::Validation(format!("comment index must be a non-negative integer, got '{raw}'")))
}
