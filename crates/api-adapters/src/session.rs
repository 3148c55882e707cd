//! # Session cookie
//!
//! The admin session rides in a single HttpOnly cookie holding the signed
//! token. Cookie headers are built and parsed by hand; the format is small
//! and fixed.

use axum::extract::FromRequestParts;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use configs::{path_has_prefix, AuthSettings};
use domains::{Subject, SESSION_TTL_SECS};

use crate::error::ApiError;
use crate::state::AppState;

/// Builds and reads the session cookie.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
}

impl SessionCookies {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `Set-Cookie` value carrying a fresh token, scoped to the whole site.
    pub fn issue(&self, token: &str) -> String {
        format!(
            "{}={token}; HttpOnly; SameSite=Lax; Path=/; Max-Age={SESSION_TTL_SECS}{}",
            self.name,
            self.secure_attr()
        )
    }

    /// `Set-Cookie` value that makes the browser drop the session immediately.
    pub fn clear(&self) -> String {
        format!(
            "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
            self.name,
            self.secure_attr()
        )
    }

    /// Returns the session token from the request's `Cookie` headers, if any.
    /// An empty value counts as absent.
    pub fn read<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == self.name)
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure {
            "; Secure"
        } else {
            ""
        }
    }
}

/// Which paths require a session, and where callers without one are sent.
#[derive(Debug, Clone)]
pub struct SessionPolicy {
    pub cookies: SessionCookies,
    pub login_path: String,
    pub protected_prefixes: Vec<String>,
}

impl SessionPolicy {
    pub fn from_settings(auth: &AuthSettings, secure: bool) -> Self {
        Self {
            cookies: SessionCookies::new(auth.cookie_name.clone(), secure),
            login_path: auth.login_path.clone(),
            protected_prefixes: auth.protected_prefixes.clone(),
        }
    }

    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes
            .iter()
            .any(|prefix| path_has_prefix(path, prefix))
    }
}

/// Extractor for handlers that require a logged-in admin.
///
/// Rejects with 401 and a JSON body; the browser-facing redirect lives in the
/// edge gate.
#[derive(Debug, Clone)]
pub struct AdminSession(pub Subject);

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = state.session.cookies.read(&parts.headers);
        let subject = state.auth.authenticate(token)?;
        Ok(AdminSession(subject))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn cookies() -> SessionCookies {
        SessionCookies::new("auth_token", false)
    }

    #[test]
    fn issued_cookie_carries_the_session_attributes() {
        let cookie = cookies().issue("abc.def.ghi");
        assert_eq!(
            cookie,
            "auth_token=abc.def.ghi; HttpOnly; SameSite=Lax; Path=/; Max-Age=600"
        );
    }

    #[test]
    fn secure_flag_is_added_when_configured() {
        let secure = SessionCookies::new("auth_token", true);
        assert!(secure.issue("t").ends_with("; Secure"));
        assert!(secure.clear().ends_with("Max-Age=0; Secure"));
    }

    #[test]
    fn cleared_cookie_expires_immediately() {
        assert_eq!(
            cookies().clear(),
            "auth_token=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0"
        );
    }

    #[test]
    fn reads_the_named_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; auth_token=tok123; lang=tr"),
        );
        assert_eq!(cookies().read(&headers), Some("tok123"));
    }

    #[test]
    fn reads_across_multiple_cookie_headers() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(COOKIE, HeaderValue::from_static("auth_token=tok456"));
        assert_eq!(cookies().read(&headers), Some("tok456"));
    }

    #[test]
    fn missing_or_empty_cookie_reads_as_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(cookies().read(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("auth_token=; theme=dark"));
        assert_eq!(cookies().read(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("not_auth_token=x"));
        assert_eq!(cookies().read(&headers), None);
    }

    #[test]
    fn protection_is_segment_aware() {
        let policy = SessionPolicy {
            cookies: cookies(),
            login_path: "/login".into(),
            protected_prefixes: vec!["/admin".into()],
        };
        assert!(policy.is_protected("/admin"));
        assert!(policy.is_protected("/admin/posts"));
        assert!(!policy.is_protected("/administrator"));
        assert!(!policy.is_protected("/login"));
    }
}
