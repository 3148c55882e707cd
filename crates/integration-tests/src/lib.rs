//! Shared fixtures for the HTTP suites.
//!
//! Every [`TestApp`] is the production router over a fresh in-memory store,
//! with real Argon2 verification and real signed session tokens.

#![cfg(feature = "web-axum")]

use std::sync::{Arc, OnceLock};

use api_adapters::{AppState, Ports, SessionCookies, SessionPolicy};
use auth_adapters::{hash_password, Argon2PasswordVerifier, JwtSessionTokens};
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use domains::{AdminAccount, Blocklist, NewPost, Post, SessionTokens, SESSION_TTL_SECS};
use serde_json::Value;
use storage_adapters::InMemoryStore;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "correct horse battery staple";
pub const JWT_SECRET: &[u8] = b"integration-test-secret-0123456789abcdef";
pub const COOKIE_NAME: &str = "auth_token";
pub const LEGACY_ID: &str = "legacy-post-1";
pub const BLOCKED_TERM: &str = "kelime";

/// Argon2 is slow in debug builds; hash once per test binary.
fn admin_password_hash() -> &'static str {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| hash_password(ADMIN_PASSWORD).unwrap())
}

fn post(title: &str, legacy_id: Option<&str>, visible: bool, comments_allowed: bool) -> Post {
    Post::create(
        NewPost {
            title: title.to_string(),
            body: format!("{title} body"),
            legacy_id: legacy_id.map(str::to_string),
            visible,
            comments_allowed,
        },
        Utc::now(),
    )
    .unwrap()
}

/// The posts every fresh app starts with.
pub struct SeededPosts {
    /// Visible, accepts comments, carries [`LEGACY_ID`].
    pub open: Post,
    /// Visible, comments disabled.
    pub closed: Post,
    /// Not visible to the public.
    pub hidden: Post,
}

pub struct TestApp {
    router: Router,
    pub store: Arc<InMemoryStore>,
    pub tokens: Arc<JwtSessionTokens>,
    pub admin: AdminAccount,
    pub posts: SeededPosts,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_admin(true)
    }

    /// An app whose store has no admin account yet.
    pub fn without_admin() -> Self {
        Self::with_admin(false)
    }

    fn with_admin(provisioned: bool) -> Self {
        let admin = AdminAccount {
            id: Uuid::new_v4(),
            username: ADMIN_USERNAME.to_string(),
            password_hash: admin_password_hash().to_string(),
        };
        let posts = SeededPosts {
            open: post("Welcome", Some(LEGACY_ID), true, true),
            closed: post("Announcements", None, true, false),
            hidden: post("Draft", None, false, true),
        };

        let mut store = InMemoryStore::new()
            .with_blocklist(Blocklist::new([BLOCKED_TERM]))
            .with_posts([posts.open.clone(), posts.closed.clone(), posts.hidden.clone()]);
        if provisioned {
            store = store.with_admin(admin.clone());
        }
        let store = Arc::new(store);
        let tokens = Arc::new(JwtSessionTokens::new(JWT_SECRET));

        let ports = Ports {
            posts: store.clone(),
            blocklist: store.clone(),
            admins: store.clone(),
            passwords: Arc::new(Argon2PasswordVerifier),
            tokens: tokens.clone(),
        };
        let session = SessionPolicy {
            cookies: SessionCookies::new(COOKIE_NAME, false),
            login_path: "/login".to_string(),
            protected_prefixes: vec!["/admin".to_string()],
        };
        let router = api_adapters::router(AppState::new(ports, session), &[]);

        Self {
            router,
            store,
            tokens,
            admin,
            posts,
        }
    }

    /// A `Cookie` header value holding a freshly issued session.
    pub fn session_cookie(&self) -> String {
        let credential = self.tokens.issue(&self.admin.subject()).unwrap();
        format!("{COOKIE_NAME}={}", credential.token)
    }

    /// A `Cookie` header value holding a session that ran out a second ago.
    pub fn expired_cookie(&self) -> String {
        let issued_at = Utc::now() - Duration::seconds(SESSION_TTL_SECS + 1);
        let credential = self.tokens.issue_at(&self.admin.subject(), issued_at).unwrap();
        format!("{COOKIE_NAME}={}", credential.token)
    }

    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::GET, uri, None, cookie)).await
    }

    pub async fn post(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::POST, uri, Some(body), cookie)).await
    }

    pub async fn patch(&self, uri: &str, body: Value, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::PATCH, uri, Some(body), cookie)).await
    }

    pub async fn delete(&self, uri: &str, cookie: Option<&str>) -> TestResponse {
        self.send(request(Method::DELETE, uri, None, cookie)).await
    }
}

pub fn request(method: Method, uri: &str, body: Option<Value>, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers.get(SET_COOKIE).and_then(|v| v.to_str().ok())
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(LOCATION).and_then(|v| v.to_str().ok())
    }

    /// The `name=value` pair of the `Set-Cookie` header, ready to send back.
    pub fn cookie_pair(&self) -> Option<String> {
        self.set_cookie()
            .and_then(|cookie| cookie.split(';').next())
            .map(str::to_string)
    }

    pub fn error(&self) -> &str {
        self.body["error"].as_str().unwrap_or_default()
    }
}
