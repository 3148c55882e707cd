//! # Edge gate
//!
//! Runs in front of every route. Requests under a protected prefix need a
//! valid session cookie; everything else passes through untouched.
//!
//! | cookie            | outcome                                   |
//! |-------------------|-------------------------------------------|
//! | absent            | 307 to the login path                     |
//! | present, invalid  | 307 to the login path, cookie cleared     |
//! | present, valid    | request continues unmodified              |

use axum::extract::{Request, State};
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use tracing::debug;

use crate::state::AppState;

pub async fn edge_gate(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let policy = &state.session;
    if !policy.is_protected(req.uri().path()) {
        return next.run(req).await;
    }

    let verdict = policy
        .cookies
        .read(req.headers())
        .map(|token| state.auth.authenticate(Some(token)));

    match verdict {
        Some(Ok(subject)) => {
            debug!(path = %req.uri().path(), admin = %subject.username, "session accepted");
            next.run(req).await
        }
        Some(Err(_)) => {
            debug!(path = %req.uri().path(), "session rejected; redirecting to login");
            ([(SET_COOKIE, policy.cookies.clear())], Redirect::temporary(&policy.login_path))
                .into_response()
        }
        None => {
            debug!(path = %req.uri().path(), "no session; redirecting to login");
            Redirect::temporary(&policy.login_path).into_response()
        }
    }
}
