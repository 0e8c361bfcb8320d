//! Domain service for the anime catalog.

use thiserror::Error;

use crate::models::anime::{Anime, NewAnime};

/// Errors specific to catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Anime not found: {0}")]
    NotFound(i32),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<anyhow::Error> for CatalogError {
    fn from(err: anyhow::Error) -> Self {
        Self::Database(err.to_string())
    }
}

/// Domain service trait for catalog reads and writes.
#[async_trait::async_trait]
pub trait CatalogService: Send + Sync {
    /// All catalog entries.
    async fn list(&self) -> Result<Vec<Anime>, CatalogError>;

    /// A single entry, or `None` when the id is unknown.
    async fn get(&self, id: i32) -> Result<Option<Anime>, CatalogError>;

    /// Entries whose English or Japanese title starts with `prefix`,
    /// matched case-sensitively.
    async fn search_by_prefix(&self, prefix: &str) -> Result<Vec<Anime>, CatalogError>;

    /// Adds one entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] when required fields are empty.
    async fn create(&self, new: NewAnime) -> Result<Anime, CatalogError>;

    /// Adds a batch of entries atomically.
    async fn create_many(&self, items: Vec<NewAnime>) -> Result<Vec<Anime>, CatalogError>;

    /// Replaces all fields of an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] when the id is unknown.
    async fn update(&self, id: i32, fields: NewAnime) -> Result<Anime, CatalogError>;

    /// Deletes an entry. Returns `false` when nothing was stored under the
    /// id; a missing entry is not an error.
    async fn remove(&self, id: i32) -> Result<bool, CatalogError>;
}
