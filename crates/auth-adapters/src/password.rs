//! Argon2id password hashing and verification.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, SaltString};
use argon2::{Argon2, PasswordVerifier as _};
use async_trait::async_trait;
use domains::{DomainError, DomainResult, PasswordVerifier};

/// Verifies passwords against stored PHC strings.
///
/// Argon2 is deliberately slow, so verification runs on the blocking pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordVerifier;

#[async_trait]
impl PasswordVerifier for Argon2PasswordVerifier {
    async fn verify(&self, password: &str, password_hash: &str) -> DomainResult<bool> {
        let password = password.to_owned();
        let phc = password_hash.to_owned();

        tokio::task::spawn_blocking(move || verify_blocking(&password, &phc))
            .await
            .map_err(DomainError::upstream)?
    }
}

fn verify_blocking(password: &str, phc: &str) -> DomainResult<bool> {
    let parsed = PasswordHash::new(phc)
        .map_err(|e| DomainError::Upstream(format!("stored password hash is malformed: {e}")))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(DomainError::upstream(e)),
    }
}

/// Hashes `password` with a fresh random salt, returning a PHC string.
pub fn hash_password(password: &str) -> DomainResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(DomainError::upstream)
}
