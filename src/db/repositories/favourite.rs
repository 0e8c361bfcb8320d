use anyhow::{Context, Result};
use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait, QueryOrder, Set};
use tracing::info;

use crate::entities::{anime, favourites, prelude::*};
use crate::models::anime::Anime;

pub struct FavouriteRepository {
    conn: DatabaseConnection,
}

impl FavouriteRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Links an anime to an account. A duplicate pair violates the
    /// composite primary key and raises; callers classify that with
    /// [`crate::db::is_unique_violation`].
    pub async fn insert(&self, anime_id: i32, account_id: i32) -> Result<()> {
        let link = favourites::ActiveModel {
            anime_id: Set(anime_id),
            account_id: Set(account_id),
        };

        Favourites::insert(link)
            .exec_without_returning(&self.conn)
            .await
            .context("Failed to insert favourite link")?;

        info!("Favourite added: anime {anime_id} for account {account_id}");
        Ok(())
    }

    pub async fn remove(&self, anime_id: i32, account_id: i32) -> Result<bool> {
        let result = Favourites::delete_by_id((anime_id, account_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete favourite link")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn contains(&self, anime_id: i32, account_id: i32) -> Result<bool> {
        let link = Favourites::find_by_id((anime_id, account_id))
            .one(&self.conn)
            .await
            .context("Failed to query favourite link")?;

        Ok(link.is_some())
    }

    /// All catalog entries the account has favourited, resolved through
    /// the join table. An unknown account simply has no links.
    pub async fn list_for(&self, account_id: i32) -> Result<Vec<Anime>> {
        let Some(account) = Accounts::find_by_id(account_id)
            .one(&self.conn)
            .await
            .context("Failed to query account for favourites")?
        else {
            return Ok(Vec::new());
        };

        let models = account
            .find_related(anime::Entity)
            .order_by_asc(anime::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list favourites")?;

        Ok(models.into_iter().map(Anime::from).collect())
    }
}
