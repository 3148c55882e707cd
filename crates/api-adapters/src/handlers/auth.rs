//! Login, logout and the "who am I" probe.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use domains::Subject;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::session::AdminSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub id: Uuid,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// `POST /auth`
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;

    let result = state.auth.login(&body.username, &body.password).await;
    state.metrics.record_login(&result);
    let credential = result?;

    let cookie = state.session.cookies.issue(&credential.token);
    let body = LoginResponse {
        id: credential.subject.id,
        username: credential.subject.username,
        expires_at: credential.expires_at,
    };
    Ok(([(SET_COOKIE, cookie)], Json(body)))
}

/// `GET /auth/me`
pub async fn me(AdminSession(subject): AdminSession) -> Json<Subject> {
    Json(subject)
}

/// `POST /logout`. Always succeeds, with or without a session.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(SET_COOKIE, state.session.cookies.clear())],
        Json(json!({ "message": "logged out" })),
    )
}
