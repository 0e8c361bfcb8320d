//! Domain service for per-account favourite links.

use thiserror::Error;

use crate::models::anime::Anime;

/// Errors specific to favourites operations.
#[derive(Debug, Error)]
pub enum FavouritesError {
    #[error("Anime is already in favourites")]
    Conflict,

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for FavouritesError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for the favourites ledger.
#[async_trait::async_trait]
pub trait FavouritesService: Send + Sync {
    /// Links an anime to an account. Returns `false` without storing
    /// anything when the account does not exist or resolves to the Admin
    /// role; those are outcomes, not errors.
    ///
    /// # Errors
    ///
    /// Returns [`FavouritesError::Conflict`] when the link already exists.
    async fn add(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError>;

    /// Unlinks an anime from an account. Returns `false` when no link was
    /// stored for the pair.
    async fn remove(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError>;

    /// True when the pair is currently linked.
    async fn contains(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError>;

    /// All catalog entries the account has favourited.
    async fn list_for(&self, account_id: i32) -> Result<Vec<Anime>, FavouritesError>;
}
