//! HS256 session tokens.
//!
//! Tokens are stateless: validity is signature plus `exp`, checked with zero
//! leeway so a credential dies exactly [`SESSION_TTL_SECS`] after issuance.

use chrono::{DateTime, Duration, TimeZone, Utc};
use domains::{Credential, DomainError, DomainResult, SessionTokens, Subject, SESSION_TTL_SECS};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: Uuid,
    username: String,
    iat: i64,
    exp: i64,
}

pub struct JwtSessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtSessionTokens {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }
}

impl SessionTokens for JwtSessionTokens {
    fn issue_at(&self, subject: &Subject, issued_at: DateTime<Utc>) -> DomainResult<Credential> {
        let expires_at = issued_at + Duration::seconds(SESSION_TTL_SECS);
        let claims = Claims {
            sub: subject.id,
            username: subject.username.clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(DomainError::upstream)?;

        Ok(Credential {
            token,
            subject: subject.clone(),
            // Second precision, matching what the token itself carries.
            issued_at: Utc.timestamp_opt(claims.iat, 0).single().unwrap_or(issued_at),
            expires_at: Utc.timestamp_opt(claims.exp, 0).single().unwrap_or(expires_at),
        })
    }

    fn verify(&self, token: &str) -> DomainResult<Subject> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|err| {
            debug!(error = %err, "session token rejected");
            DomainError::Auth("invalid or expired session token".into())
        })?;

        Ok(Subject {
            id: data.claims.sub,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret-that-is-at-least-32-bytes!!";

    fn subject() -> Subject {
        Subject {
            id: Uuid::new_v4(),
            username: "admin".into(),
        }
    }

    #[test]
    fn issued_token_verifies_to_the_same_subject() {
        let tokens = JwtSessionTokens::new(SECRET);
        let subject = subject();
        let credential = tokens.issue(&subject).unwrap();

        assert_eq!(tokens.verify(&credential.token).unwrap(), subject);
        assert_eq!(
            (credential.expires_at - credential.issued_at).num_seconds(),
            SESSION_TTL_SECS
        );
    }

    #[test]
    fn token_past_its_window_is_rejected() {
        let tokens = JwtSessionTokens::new(SECRET);
        let issued_at = Utc::now() - Duration::seconds(SESSION_TTL_SECS + 1);
        let credential = tokens.issue_at(&subject(), issued_at).unwrap();

        let err = tokens.verify(&credential.token).unwrap_err();
        assert!(matches!(err, DomainError::Auth(_)));
    }

    #[test]
    fn token_just_inside_its_window_is_accepted() {
        let tokens = JwtSessionTokens::new(SECRET);
        let issued_at = Utc::now() - Duration::seconds(SESSION_TTL_SECS - 30);
        let credential = tokens.issue_at(&subject(), issued_at).unwrap();

        assert!(tokens.verify(&credential.token).is_ok());
    }

    #[test]
    fn token_from_another_secret_is_rejected() {
        let other = JwtSessionTokens::new(b"a-completely-different-32-byte-secret");
        let credential = other.issue(&subject()).unwrap();

        let err = JwtSessionTokens::new(SECRET)
            .verify(&credential.token)
            .unwrap_err();
        assert!(matches!(err, DomainError::Auth(_)));
    }

    #[test]
    fn tampered_or_garbage_tokens_are_rejected() {
        let tokens = JwtSessionTokens::new(SECRET);
        let mut token = tokens.issue(&subject()).unwrap().token;
        token.push('x');

        assert!(tokens.verify(&token).is_err());
        assert!(tokens.verify("not.a.jwt").is_err());
        assert!(tokens.verify("").is_err());
    }
}
