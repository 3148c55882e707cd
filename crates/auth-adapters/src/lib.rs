//! # auth-adapters
//!
//! Argon2-based implementation of `PasswordVerifier` and, behind the
//! `auth-jwt` feature, HS256 session tokens implementing `SessionTokens`.

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::{hash_password, Argon2PasswordVerifier};

#[cfg(feature = "auth-jwt")]
pub use jwt::JwtSessionTokens;
