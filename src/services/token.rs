use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

use crate::db::Account;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token: {0}")]
    Invalid(String),

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Token is missing required identity claims")]
    MissingClaims,
}

/// Claims carried by an issued token. `sub` and `role` hold stringified
/// integer ids; [`AuthContext`] re-parses them once per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub name: String,
    pub role: String,
    pub iat: u64,
    pub exp: u64,
}

/// Caller identity extracted from verified claims.
#[derive(Debug, Clone, Copy)]
pub struct AuthContext {
    pub account_id: i32,
    pub role_id: i32,
}

impl TryFrom<&Claims> for AuthContext {
    type Error = TokenError;

    fn try_from(claims: &Claims) -> Result<Self, TokenError> {
        let account_id = claims.sub.parse().map_err(|_| TokenError::MissingClaims)?;
        let role_id = claims.role.parse().map_err(|_| TokenError::MissingClaims)?;

        Ok(Self {
            account_id,
            role_id,
        })
    }
}

/// Signs and verifies HS256 bearer tokens for authenticated accounts.
pub struct TokenIssuer {
    secret: String,
    ttl_hours: u64,
}

impl TokenIssuer {
    #[must_use]
    pub const fn new(secret: String, ttl_hours: u64) -> Self {
        Self { secret, ttl_hours }
    }

    /// Issues a token for the account, valid for the configured TTL.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if encoding fails.
    pub fn issue(&self, account: &Account) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();

        let claims = Claims {
            sub: account.id.to_string(),
            name: account.username.clone(),
            role: account.role_id.to_string(),
            iat: now,
            exp: now + self.ttl_hours * 3600,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Invalid`] for bad signatures, expired tokens,
    /// or malformed input.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let validation = Validation::new(Algorithm::HS256);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| TokenError::Invalid(e.to_string()))
    }
}
