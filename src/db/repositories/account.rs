use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use crate::entities::accounts;

/// Account data returned from the repository (without the password digest)
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: i32,
    pub username: String,
    pub role_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl From<accounts::Model> for Account {
    fn from(model: accounts::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            role_id: model.role_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct AccountRepository {
    conn: DatabaseConnection,
}

impl AccountRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a new account with the digest of `password`. The unique
    /// index on `username` raises on duplicates; callers classify that
    /// with [`crate::db::is_unique_violation`].
    pub async fn register(&self, username: &str, password: &str, role_id: i32) -> Result<Account> {
        let now = chrono::Utc::now().to_rfc3339();

        let active = accounts::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(digest_password(password)),
            role_id: Set(role_id),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert account")?;

        info!("Registered account: {}", model.username);
        Ok(Account::from(model))
    }

    /// Looks up an account by username and password in one exact match on
    /// the stored digest. Returns `None` for unknown usernames and wrong
    /// passwords alike.
    pub async fn find_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .filter(accounts::Column::PasswordHash.eq(digest_password(password)))
            .one(&self.conn)
            .await
            .context("Failed to query account by credentials")?;

        Ok(account.map(Account::from))
    }

    pub async fn get_by_id(&self, id: i32) -> Result<Option<Account>> {
        let account = accounts::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query account by id")?;

        Ok(account.map(Account::from))
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<Account>> {
        let account = accounts::Entity::find()
            .filter(accounts::Column::Username.eq(username))
            .one(&self.conn)
            .await
            .context("Failed to query account by username")?;

        Ok(account.map(Account::from))
    }

    pub async fn list(&self) -> Result<Vec<Account>> {
        let accounts = accounts::Entity::find()
            .order_by_asc(accounts::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list accounts")?;

        Ok(accounts.into_iter().map(Account::from).collect())
    }

    /// Stores a new password digest for the account. The incoming value is
    /// compared against the stored digest first; since a plaintext never
    /// equals its own digest, every ordinary call rehashes. Passing the
    /// stored digest itself is the one input that leaves the row unchanged.
    pub async fn update_password(&self, account_id: i32, password: &str) -> Result<Account> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.conn)
            .await
            .context("Failed to query account for password update")?
            .ok_or_else(|| anyhow::anyhow!("Account not found: {account_id}"))?;

        let stored_digest = account.password_hash.clone();

        let mut active: accounts::ActiveModel = account.into();
        if password != stored_digest {
            active.password_hash = Set(digest_password(password));
        }
        active.updated_at = Set(chrono::Utc::now().to_rfc3339());

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update account password")?;

        Ok(Account::from(model))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = accounts::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete account")?;

        Ok(result.rows_affected > 0)
    }
}

/// Lowercase hex SHA-256 digest of the UTF-8 password bytes.
#[must_use]
pub fn digest_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
