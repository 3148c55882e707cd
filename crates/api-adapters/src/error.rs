//! # ApiError
//!
//! Maps every `DomainError` onto an HTTP status and a JSON body of the form
//! `{"error": "<message>"}`.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use domains::DomainError;
use serde_json::json;
use tracing::{debug, error};

const MALFORMED_BODY: &str = "malformed request body";
const MALFORMED_PATH: &str = "malformed request path";

#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_)
            | DomainError::EmptyInput { .. }
            | DomainError::IndexOutOfRange { .. }
            | DomainError::ForbiddenContent => StatusCode::BAD_REQUEST,
            DomainError::Auth(_) => StatusCode::UNAUTHORIZED,
            DomainError::CommentsDisabled => StatusCode::FORBIDDEN,
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
            DomainError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message shown to the client. Infrastructure details stay in the logs.
    pub fn user_message(&self) -> String {
        match &self.0 {
            DomainError::Validation(msg) | DomainError::Auth(msg) => msg.clone(),
            DomainError::Upstream(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

// Parser details go to the logs only.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "request body rejected");
        Self(DomainError::Validation(MALFORMED_BODY.into()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        debug!(rejection = %rejection.body_text(), "request path rejected");
        Self(DomainError::Validation(MALFORMED_PATH.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let DomainError::Upstream(detail) = &self.0 {
            error!(error = %detail, "request failed on an upstream dependency");
        }
        let body = Json(json!({ "error": self.user_message() }));
        (self.status_code(), body).into_response()
    }
}
