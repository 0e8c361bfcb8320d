//! `SeaORM` implementation of the `CatalogService` trait.

use crate::db::Store;
use crate::models::anime::{Anime, NewAnime};
use crate::services::catalog_service::{CatalogError, CatalogService};
use async_trait::async_trait;

pub struct SeaOrmCatalogService {
    store: Store,
}

impl SeaOrmCatalogService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn validate(new: &NewAnime) -> Result<(), CatalogError> {
        if new.english_title.trim().is_empty() {
            return Err(CatalogError::Validation(
                "English title is required".to_string(),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl CatalogService for SeaOrmCatalogService {
    async fn list(&self) -> Result<Vec<Anime>, CatalogError> {
        Ok(self.store.list_anime().await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Anime>, CatalogError> {
        Ok(self.store.get_anime(id).await?)
    }

    async fn search_by_prefix(&self, prefix: &str) -> Result<Vec<Anime>, CatalogError> {
        Ok(self.store.find_anime_by_prefix(prefix).await?)
    }

    async fn create(&self, new: NewAnime) -> Result<Anime, CatalogError> {
        Self::validate(&new)?;

        Ok(self.store.add_anime(&new).await?)
    }

    async fn create_many(&self, items: Vec<NewAnime>) -> Result<Vec<Anime>, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Validation(
                "Batch must contain at least one entry".to_string(),
            ));
        }

        for item in &items {
            Self::validate(item)?;
        }

        Ok(self.store.add_anime_batch(&items).await?)
    }

    async fn update(&self, id: i32, fields: NewAnime) -> Result<Anime, CatalogError> {
        Self::validate(&fields)?;

        self.store
            .update_anime(id, &fields)
            .await?
            .ok_or(CatalogError::NotFound(id))
    }

    async fn remove(&self, id: i32) -> Result<bool, CatalogError> {
        Ok(self.store.remove_anime(id).await?)
    }
}
