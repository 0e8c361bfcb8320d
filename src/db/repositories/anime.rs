use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::info;

use crate::entities::anime;
use crate::models::anime::{Anime, NewAnime};

impl From<anime::Model> for Anime {
    fn from(model: anime::Model) -> Self {
        Self {
            id: model.id,
            english_title: model.english_title,
            japanese_title: model.japanese_title,
            trailer_url: model.trailer_url,
            image_url: model.image_url,
            synopsis: model.synopsis,
            airing: model.airing,
            episodes: model.episodes,
            score: model.score,
        }
    }
}

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn active_from_new(new: &NewAnime) -> anime::ActiveModel {
        anime::ActiveModel {
            english_title: Set(new.english_title.clone()),
            japanese_title: Set(new.japanese_title.clone()),
            trailer_url: Set(new.trailer_url.clone()),
            image_url: Set(new.image_url.clone()),
            synopsis: Set(new.synopsis.clone()),
            airing: Set(new.airing),
            episodes: Set(new.episodes),
            score: Set(new.score),
            ..Default::default()
        }
    }

    pub async fn add(&self, new: &NewAnime) -> Result<Anime> {
        let model = Self::active_from_new(new)
            .insert(&self.conn)
            .await
            .context("Failed to insert anime")?;

        info!("Added anime: {}", model.english_title);
        Ok(Anime::from(model))
    }

    /// Inserts a batch atomically. One failing row rolls back the lot.
    pub async fn add_many(&self, items: &[NewAnime]) -> Result<Vec<Anime>> {
        let txn = self.conn.begin().await?;

        let mut created = Vec::with_capacity(items.len());
        for item in items {
            let model = Self::active_from_new(item)
                .insert(&txn)
                .await
                .context("Failed to insert anime batch")?;
            created.push(Anime::from(model));
        }

        txn.commit().await?;

        info!("Added {} anime entries", created.len());
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Anime>> {
        let model = anime::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query anime by id")?;

        Ok(model.map(Anime::from))
    }

    pub async fn list(&self) -> Result<Vec<Anime>> {
        let models = anime::Entity::find()
            .order_by_asc(anime::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list anime")?;

        Ok(models.into_iter().map(Anime::from).collect())
    }

    /// Replaces every mutable field of an existing entry. Returns `None`
    /// when the id is unknown.
    pub async fn update(&self, id: i32, fields: &NewAnime) -> Result<Option<Anime>> {
        let Some(existing) = anime::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query anime for update")?
        else {
            return Ok(None);
        };

        let mut active: anime::ActiveModel = existing.into();
        active.english_title = Set(fields.english_title.clone());
        active.japanese_title = Set(fields.japanese_title.clone());
        active.trailer_url = Set(fields.trailer_url.clone());
        active.image_url = Set(fields.image_url.clone());
        active.synopsis = Set(fields.synopsis.clone());
        active.airing = Set(fields.airing);
        active.episodes = Set(fields.episodes);
        active.score = Set(fields.score);

        let model = active
            .update(&self.conn)
            .await
            .context("Failed to update anime")?;

        Ok(Some(Anime::from(model)))
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = anime::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete anime")?;

        Ok(result.rows_affected > 0)
    }

    /// Case-sensitive prefix search over the English and Japanese titles.
    /// SQLite LIKE is case-insensitive for ASCII, so the query fetches a
    /// superset and `starts_with` restores exact matching. Wildcards in the
    /// prefix can only widen the candidate set, never shrink it.
    pub async fn find_by_prefix(&self, prefix: &str) -> Result<Vec<Anime>> {
        let pattern = format!("{prefix}%");

        let candidates = anime::Entity::find()
            .filter(
                Condition::any()
                    .add(anime::Column::EnglishTitle.like(pattern.clone()))
                    .add(anime::Column::JapaneseTitle.like(pattern)),
            )
            .order_by_asc(anime::Column::EnglishTitle)
            .all(&self.conn)
            .await
            .context("Failed to search anime by title prefix")?;

        Ok(candidates
            .into_iter()
            .filter(|m| {
                m.english_title.starts_with(prefix)
                    || m.japanese_title
                        .as_deref()
                        .is_some_and(|t| t.starts_with(prefix))
            })
            .map(Anime::from)
            .collect())
    }
}
