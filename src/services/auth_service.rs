//! Domain service for account registration, login, and password changes.

use serde::Serialize;
use thiserror::Error;

use crate::db::Account;

/// Errors specific to account operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username already used, try a new one")]
    DuplicateUsername,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account not found")]
    AccountNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Login result: the account's username and its signed bearer token.
#[derive(Debug, Clone, Serialize)]
pub struct TokenGrant {
    pub username: String,
    pub token: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account with the given role. The password is digested
    /// before it is persisted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::DuplicateUsername`] when the username is taken
    /// and [`AuthError::Validation`] when the role id is not recognized.
    async fn register(
        &self,
        username: &str,
        password: &str,
        role_id: i32,
    ) -> Result<Account, AuthError>;

    /// Verifies credentials and issues a bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if no account matches the
    /// username and password pair.
    async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, AuthError>;

    /// Changes an account's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if the current password
    /// does not match.
    async fn change_password(
        &self,
        account_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// True when the role id resolves to the Admin role.
    async fn is_admin_role(&self, role_id: i32) -> Result<bool, AuthError>;

    /// True when the role id resolves to the Client role.
    async fn is_client_role(&self, role_id: i32) -> Result<bool, AuthError>;
}
