//! Public post reads and admin post management.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use domains::{NewPost, Post, PostPatch};
use serde::Serialize;
use serde_json::json;
use tracing::info;

use crate::error::ApiError;
use crate::session::AdminSession;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PostsResponse {
    pub posts: Vec<Post>,
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub post: Post,
}

/// `GET /blogs`: visible posts only.
pub async fn list_public(State(state): State<AppState>) -> Result<Json<PostsResponse>, ApiError> {
    let posts = state.posts.list(false).await?;
    Ok(Json(PostsResponse { posts }))
}

/// `GET /blogs/{id}`: hidden posts read as missing.
pub async fn get_public(
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.get(&post_ref, false).await?;
    Ok(Json(PostResponse { post }))
}

/// `GET /admin/posts`
pub async fn list_all(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<PostsResponse>, ApiError> {
    let posts = state.posts.list(true).await?;
    Ok(Json(PostsResponse { posts }))
}

/// `GET /admin/posts/{id}`
pub async fn get_any(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
) -> Result<Json<PostResponse>, ApiError> {
    let post = state.posts.get(&post_ref, true).await?;
    Ok(Json(PostResponse { post }))
}

/// `POST /admin/posts`
pub async fn create(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(new) = payload?;
    let post = state.posts.create(new).await?;
    info!(admin = %admin.username, post_id = %post.id, "post created");
    Ok((StatusCode::CREATED, Json(PostResponse { post })))
}

/// `PATCH /admin/posts/{id}`
pub async fn update(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
    payload: Result<Json<PostPatch>, JsonRejection>,
) -> Result<Json<PostResponse>, ApiError> {
    let Json(patch) = payload?;
    let post = state.posts.update(&post_ref, patch).await?;
    info!(admin = %admin.username, post_id = %post.id, "post updated");
    Ok(Json(PostResponse { post }))
}

/// `DELETE /admin/posts/{id}`
pub async fn delete(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(post_ref): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = state.posts.delete(&post_ref).await?;
    info!(admin = %admin.username, post_id = %id, "post deleted");
    Ok(Json(json!({ "deleted": id })))
}
