use axum::{
    Extension, Json,
    extract::{Path, State},
};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, FavouriteStatus};
use crate::api::auth::require_non_admin;
use crate::api::validation::validate_anime_id;
use crate::models::anime::Anime;
use crate::services::AuthContext;

/// GET /anime/favourites
/// All catalog entries the calling account has favourited
pub async fn list_favourites(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<ApiResponse<Vec<Anime>>>, ApiError> {
    require_non_admin(&state, ctx).await?;

    let anime = state.favourites_service().list_for(ctx.account_id).await?;

    Ok(Json(ApiResponse::success(anime)))
}

/// GET /anime/favourites/{id}
/// Whether the calling account has favourited the entry
pub async fn favourite_status(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FavouriteStatus>>, ApiError> {
    require_non_admin(&state, ctx).await?;
    let id = validate_anime_id(id)?;

    let favourite = state
        .favourites_service()
        .contains(id, ctx.account_id)
        .await?;

    Ok(Json(ApiResponse::success(FavouriteStatus {
        anime_id: id,
        favourite,
    })))
}

/// POST /anime/favourites/{id}
/// Link the entry to the calling account. Duplicates are a conflict.
pub async fn add_favourite(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<FavouriteStatus>>, ApiError> {
    require_non_admin(&state, ctx).await?;
    let id = validate_anime_id(id)?;

    let added = state.favourites_service().add(id, ctx.account_id).await?;

    // The ledger refuses accounts it cannot attribute a favourite to.
    if !added {
        return Err(ApiError::forbidden(
            "This account cannot hold favourites",
        ));
    }

    Ok(Json(ApiResponse::success(FavouriteStatus {
        anime_id: id,
        favourite: true,
    })))
}

/// DELETE /anime/favourites/{id}
/// Unlink the entry. The payload reports whether a link existed.
pub async fn remove_favourite(
    State(state): State<Arc<AppState>>,
    Extension(ctx): Extension<AuthContext>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<bool>>, ApiError> {
    require_non_admin(&state, ctx).await?;
    let id = validate_anime_id(id)?;

    let removed = state
        .favourites_service()
        .remove(id, ctx.account_id)
        .await?;

    Ok(Json(ApiResponse::success(removed)))
}
