//! `SeaORM` implementation of the `FavouritesService` trait.

use crate::db::{self, Store};
use crate::models::anime::Anime;
use crate::services::favourites_service::{FavouritesError, FavouritesService};
use async_trait::async_trait;

pub struct SeaOrmFavouritesService {
    store: Store,
}

impl SeaOrmFavouritesService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }
}

#[async_trait]
impl FavouritesService for SeaOrmFavouritesService {
    async fn add(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError> {
        let Some(account) = self.store.get_account(account_id).await? else {
            return Ok(false);
        };

        // Admin accounts manage the catalog; they do not hold favourites.
        if self.store.resolve_role(account.role_id).await?.is_admin() {
            return Ok(false);
        }

        match self.store.add_favourite(anime_id, account_id).await {
            Ok(()) => Ok(true),
            Err(err) if db::is_unique_violation(&err) => Err(FavouritesError::Conflict),
            Err(err) => Err(err.into()),
        }
    }

    async fn remove(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError> {
        Ok(self.store.remove_favourite(anime_id, account_id).await?)
    }

    async fn contains(&self, anime_id: i32, account_id: i32) -> Result<bool, FavouritesError> {
        Ok(self.store.is_favourite(anime_id, account_id).await?)
    }

    async fn list_for(&self, account_id: i32) -> Result<Vec<Anime>, FavouritesError> {
        Ok(self.store.favourites_for_account(account_id).await?)
    }
}
