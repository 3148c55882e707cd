//! # Admin session
//!
//! Login against the single admin account and identification of the caller
//! from a session token.

use std::sync::Arc;

use domains::{
    AdminRepository, Credential, DomainError, DomainResult, PasswordVerifier, SessionTokens,
    Subject,
};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "invalid username or password";

pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
    passwords: Arc<dyn PasswordVerifier>,
    tokens: Arc<dyn SessionTokens>,
}

impl AuthService {
    pub fn new(
        admins: Arc<dyn AdminRepository>,
        passwords: Arc<dyn PasswordVerifier>,
        tokens: Arc<dyn SessionTokens>,
    ) -> Self {
        Self {
            admins,
            passwords,
            tokens,
        }
    }

    /// Checks the submitted credentials and mints a session token.
    ///
    /// A wrong username and a wrong password produce the same error; only the
    /// logs tell them apart.
    pub async fn login(&self, username: &str, password: &str) -> DomainResult<Credential> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(DomainError::Validation(
                "username and password are required".into(),
            ));
        }

        let admin = match self.admins.find_admin().await? {
            Some(admin) => admin,
            None => {
                warn!("login attempted but no admin account exists");
                return Err(DomainError::not_found("admin account", username));
            }
        };

        // Verify even on a username mismatch so both failures take the same time.
        let username_matches = admin.username == username;
        let password_matches = self
            .passwords
            .verify(password, &admin.password_hash)
            .await?;

        if !username_matches {
            warn!(reason = "unknown_username", "login rejected");
            return Err(DomainError::Auth(INVALID_CREDENTIALS.into()));
        }
        if !password_matches {
            warn!(reason = "password_mismatch", admin_id = %admin.id, "login rejected");
            return Err(DomainError::Auth(INVALID_CREDENTIALS.into()));
        }

        let credential = self.tokens.issue(&admin.subject())?;
        info!(admin_id = %admin.id, "admin logged in");
        Ok(credential)
    }

    /// Identifies the caller from an optional session token.
    ///
    /// Missing and invalid tokens are the same kind of failure and differ
    /// only in their message.
    pub fn authenticate(&self, token: Option<&str>) -> DomainResult<Subject> {
        let token = match token.map(str::trim) {
            Some(token) if !token.is_empty() => token,
            _ => return Err(DomainError::Auth("missing session token".into())),
        };

        self.tokens.verify(token).map_err(|err| match err {
            DomainError::Auth(_) => DomainError::Auth("invalid or expired session token".into()),
            other => other,
        })
    }
}
