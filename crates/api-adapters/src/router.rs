//! # Router
//!
//! Route table plus the middleware stack. Layers run outermost first:
//! request id, trace span, request-id propagation, CORS, then the edge gate.

use axum::extract::Request;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{info_span, warn};

use crate::gate::edge_gate;
use crate::handlers::{auth, blocklist, comments, health, posts};
use crate::state::AppState;

pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    let routes = Router::new()
        // Session
        .route("/auth", post(auth::login))
        .route("/auth/me", get(auth::me))
        .route("/logout", post(auth::logout))
        // Public reads and comment moderation
        .route("/blogs", get(posts::list_public))
        .route("/blogs/{id}", get(posts::get_public))
        .route("/blogs/{id}/comments", get(comments::list).post(comments::add))
        .route("/blogs/{id}/comments/{index}", delete(comments::delete))
        // Admin
        .route("/admin/posts", get(posts::list_all).post(posts::create))
        .route(
            "/admin/posts/{id}",
            get(posts::get_any).patch(posts::update).delete(posts::delete),
        )
        .route("/admin/blocklist", get(blocklist::list).post(blocklist::add))
        .route("/admin/blocklist/{term}", delete(blocklist::remove))
        // Ops
        .route("/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .fallback(health::not_found);

    routes
        .layer(middleware::from_fn_with_state(state.clone(), edge_gate))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request| {
                    let request_id = req
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");
                    info_span!(
                        "http",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %request_id,
                    )
                }))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors(allowed_origins)),
        )
        .with_state(state)
}

fn cors(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
}
