use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::api::auth::require_admin;
use crate::api::validation::{validate_anime_id, validate_search_query};
use crate::models::anime::{Anime, NewAnime};
use crate::services::AuthContext;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// GET /anime
/// All catalog entries
pub async fn list_anime(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Anime>>>, ApiError> {
    let anime = state.catalog_service().list().await?;

    Ok(Json(ApiResponse::success(anime)))
}

/// GET /anime/{id}
/// A single catalog entry
pub async fn get_anime(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Anime>>, ApiError> {
    let id = validate_anime_id(id)?;

    let anime = state
        .catalog_service()
        .get(id)
        .await?
        .ok_or_else(|| ApiError::anime_not_found(id))?;

    Ok(Json(ApiResponse::success(anime)))
}

/// GET /anime/search?q=
/// Case-sensitive title prefix search over English and Japanese titles
pub async fn search_anime(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Anime>>>, ApiError> {
    let prefix = validate_search_query(&query.q)?;

    let results = state.catalog_service().search_by_prefix(prefix).await?;

    Ok(Json(ApiResponse::success(results)))
}

/// POST /anime
/// Add a catalog entry (Admin only)
pub async fn create_anime(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<NewAnime>,
) -> Result<Json<ApiResponse<Anime>>, ApiError> {
    require_admin(&state, ctx).await?;

    let created = state.catalog_service().create(payload).await?;

    Ok(Json(ApiResponse::success(created)))
}

/// POST /anime/range
/// Add a batch of catalog entries atomically (Admin only)
pub async fn create_anime_range(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Json(payload): Json<Vec<NewAnime>>,
) -> Result<Json<ApiResponse<Vec<Anime>>>, ApiError> {
    require_admin(&state, ctx).await?;

    let created = state.catalog_service().create_many(payload).await?;

    Ok(Json(ApiResponse::success(created)))
}

/// PUT /anime/{id}
/// Replace all fields of an existing entry (Admin only)
pub async fn update_anime(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
    Json(payload): Json<NewAnime>,
) -> Result<Json<ApiResponse<Anime>>, ApiError> {
    require_admin(&state, ctx).await?;
    let id = validate_anime_id(id)?;

    let updated = state.catalog_service().update(id, payload).await?;

    Ok(Json(ApiResponse::success(updated)))
}

/// DELETE /anime/{id}
/// Delete an entry (Admin only). The payload reports whether a row was
/// actually removed; deleting an unknown id is not an error.
pub async fn delete_anime(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    require_admin(&state, ctx).await?;
    let id = validate_anime_id(id)?;

    let removed = state.catalog_service().remove(id).await?;

    Ok(Json(ApiResponse::success(removed)))
}
