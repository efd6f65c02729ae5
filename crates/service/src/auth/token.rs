//! Signed session tokens (HS256 JWT).
//!
//! Verification is purely cryptographic plus an expiry check; the
//! credential store is never consulted, so a token stays valid until `exp`.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use models::account::Role;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::domain::PublicAccount;

/// Claims embedded in every session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,
    #[error("token expired")]
    Expired,
    #[error("failed to sign token: {0}")]
    Encode(String),
}

/// Issues and verifies session tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer").field("ttl_secs", &self.ttl_secs).finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_secs: i64::try_from(ttl_secs).unwrap_or(i64::MAX / 2),
        }
    }

    pub fn ttl_secs(&self) -> i64 { self.ttl_secs }

    pub fn issue(&self, account: &PublicAccount) -> Result<String, TokenError> {
        self.issue_at(account, Utc::now().timestamp())
    }

    /// Issue as if the current time were `now` (unix seconds).
    pub fn issue_at(&self, account: &PublicAccount, now: i64) -> Result<String, TokenError> {
        let claims = SessionClaims {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        debug!(account_id = claims.id, exp = claims.exp, "issuing session token");
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        decode::<SessionClaims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }
}
