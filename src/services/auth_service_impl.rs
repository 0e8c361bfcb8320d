//! `SeaORM` implementation of the `AuthService` trait.

use std::sync::Arc;

use crate::db::{self, Account, Store};
use crate::models::role::RoleKind;
use crate::services::auth_service::{AuthError, AuthService, TokenGrant};
use crate::services::token::TokenIssuer;
use async_trait::async_trait;

pub struct SeaOrmAuthService {
    store: Store,
    tokens: Arc<TokenIssuer>,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, tokens: Arc<TokenIssuer>) -> Self {
        Self { store, tokens }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(
        &self,
        username: &str,
        password: &str,
        role_id: i32,
    ) -> Result<Account, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::Validation("Username is required".to_string()));
        }

        if password.is_empty() {
            return Err(AuthError::Validation("Password is required".to_string()));
        }

        let role = self.store.resolve_role(role_id).await?;
        if role == RoleKind::Unknown {
            return Err(AuthError::Validation(format!(
                "Unknown role id: {role_id}"
            )));
        }

        if self
            .store
            .get_account_by_username(username)
            .await?
            .is_some()
        {
            return Err(AuthError::DuplicateUsername);
        }

        match self.store.register_account(username, password, role_id).await {
            Ok(account) => Ok(account),
            // Two racing registrations can both pass the existence check;
            // the loser trips the unique index instead.
            Err(err) if db::is_unique_violation(&err) => Err(AuthError::DuplicateUsername),
            Err(err) => Err(err.into()),
        }
    }

    async fn login(&self, username: &str, password: &str) -> Result<TokenGrant, AuthError> {
        let account = self
            .store
            .find_account_by_credentials(username, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let token = self
            .tokens
            .issue(&account)
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        Ok(TokenGrant {
            username: account.username,
            token,
        })
    }

    async fn change_password(
        &self,
        account_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if new_password.is_empty() {
            return Err(AuthError::Validation(
                "New password is required".to_string(),
            ));
        }

        let account = self
            .store
            .get_account(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        // Verify the current password through the same exact-match lookup
        // that login uses.
        let verified = self
            .store
            .find_account_by_credentials(&account.username, current_password)
            .await?;

        if verified.is_none() {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .update_account_password(account_id, new_password)
            .await?;

        Ok(())
    }

    async fn is_admin_role(&self, role_id: i32) -> Result<bool, AuthError> {
        Ok(self.store.is_admin_role(role_id).await?)
    }

    async fn is_client_role(&self, role_id: i32) -> Result<bool, AuthError> {
        Ok(self.store.is_client_role(role_id).await?)
    }
}
