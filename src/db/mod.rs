use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::anime::{Anime, NewAnime};
use crate::models::role::{Role, RoleKind};

pub mod migrator;
pub mod repositories;

pub use repositories::account::{Account, digest_password};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn anime_repo(&self) -> repositories::anime::AnimeRepository {
        repositories::anime::AnimeRepository::new(self.conn.clone())
    }

    fn account_repo(&self) -> repositories::account::AccountRepository {
        repositories::account::AccountRepository::new(self.conn.clone())
    }

    fn role_repo(&self) -> repositories::role::RoleRepository {
        repositories::role::RoleRepository::new(self.conn.clone())
    }

    fn favourite_repo(&self) -> repositories::favourite::FavouriteRepository {
        repositories::favourite::FavouriteRepository::new(self.conn.clone())
    }

    // --- catalog ---

    pub async fn add_anime(&self, new: &NewAnime) -> Result<Anime> {
        self.anime_repo().add(new).await
    }

    pub async fn add_anime_batch(&self, items: &[NewAnime]) -> Result<Vec<Anime>> {
        self.anime_repo().add_many(items).await
    }

    pub async fn get_anime(&self, id: i32) -> Result<Option<Anime>> {
        self.anime_repo().get(id).await
    }

    pub async fn list_anime(&self) -> Result<Vec<Anime>> {
        self.anime_repo().list().await
    }

    pub async fn update_anime(&self, id: i32, fields: &NewAnime) -> Result<Option<Anime>> {
        self.anime_repo().update(id, fields).await
    }

    pub async fn remove_anime(&self, id: i32) -> Result<bool> {
        self.anime_repo().remove(id).await
    }

    pub async fn find_anime_by_prefix(&self, prefix: &str) -> Result<Vec<Anime>> {
        self.anime_repo().find_by_prefix(prefix).await
    }

    // --- accounts ---

    pub async fn register_account(
        &self,
        username: &str,
        password: &str,
        role_id: i32,
    ) -> Result<Account> {
        self.account_repo().register(username, password, role_id).await
    }

    pub async fn find_account_by_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Option<Account>> {
        self.account_repo()
            .find_by_credentials(username, password)
            .await
    }

    pub async fn get_account(&self, id: i32) -> Result<Option<Account>> {
        self.account_repo().get_by_id(id).await
    }

    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.account_repo().get_by_username(username).await
    }

    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        self.account_repo().list().await
    }

    pub async fn update_account_password(&self, id: i32, password: &str) -> Result<Account> {
        self.account_repo().update_password(id, password).await
    }

    pub async fn remove_account(&self, id: i32) -> Result<bool> {
        self.account_repo().remove(id).await
    }

    // --- roles ---

    pub async fn get_role(&self, id: i32) -> Result<Option<Role>> {
        self.role_repo().get(id).await
    }

    pub async fn list_roles(&self) -> Result<Vec<Role>> {
        self.role_repo().list().await
    }

    pub async fn resolve_role(&self, id: i32) -> Result<RoleKind> {
        self.role_repo().resolve(id).await
    }

    pub async fn is_admin_role(&self, id: i32) -> Result<bool> {
        self.role_repo().is_admin(id).await
    }

    pub async fn is_client_role(&self, id: i32) -> Result<bool> {
        self.role_repo().is_client(id).await
    }

    // --- favourites ---

    pub async fn add_favourite(&self, anime_id: i32, account_id: i32) -> Result<()> {
        self.favourite_repo().insert(anime_id, account_id).await
    }

    pub async fn remove_favourite(&self, anime_id: i32, account_id: i32) -> Result<bool> {
        self.favourite_repo().remove(anime_id, account_id).await
    }

    pub async fn is_favourite(&self, anime_id: i32, account_id: i32) -> Result<bool> {
        self.favourite_repo().contains(anime_id, account_id).await
    }

    pub async fn favourites_for_account(&self, account_id: i32) -> Result<Vec<Anime>> {
        self.favourite_repo().list_for(account_id).await
    }
}

/// True when the error chain bottoms out in a unique or primary key
/// constraint violation. Used to tell duplicates apart from other
/// database failures.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DbErr>().and_then(DbErr::sql_err),
        Some(SqlErr::UniqueConstraintViolation(_))
    )
}
