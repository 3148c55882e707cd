//! Admin management of the comment blocklist.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::session::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TermRequest {
    #[serde(default)]
    pub term: String,
}

#[derive(Debug, Serialize)]
pub struct TermsResponse {
    pub terms: Vec<String>,
}

/// `GET /admin/blocklist`
pub async fn list(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<TermsResponse>, ApiError> {
    let terms = state.blocklist.list().await?;
    Ok(Json(TermsResponse { terms }))
}

/// `POST /admin/blocklist`
pub async fn add(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    payload: Result<Json<TermRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let terms = state.blocklist.add(&body.term).await?;
    info!(admin = %admin.username, count = terms.len(), "blocklist term added");
    Ok((StatusCode::CREATED, Json(TermsResponse { terms })))
}

/// `DELETE /admin/blocklist/{term}`
pub async fn remove(
    AdminSession(admin): AdminSession,
    State(state): State<AppState>,
    Path(term): Path<String>,
) -> Result<Json<TermsResponse>, ApiError> {
    let terms = state.blocklist.remove(&term).await?;
    info!(admin = %admin.username, count = terms.len(), "blocklist term removed");
    Ok(Json(TermsResponse { terms }))
}
