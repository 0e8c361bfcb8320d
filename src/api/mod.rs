use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

mod anime;
pub mod auth;
mod error;
mod favourites;
mod observability;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Arc<RwLock<Config>> {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn token_issuer(&self) -> &Arc<crate::services::TokenIssuer> {
        &self.shared.tokens
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn catalog_service(&self) -> &Arc<dyn crate::services::CatalogService> {
        &self.shared.catalog_service
    }

    #[must_use]
    pub fn favourites_service(&self) -> &Arc<dyn crate::services::FavouritesService> {
        &self.shared.favourites_service
    }
}

pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> Router {
    let cors_origins = {
        let config = state.config().read().await;
        config.server.cors_allowed_origins.clone()
    };

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/anime", get(anime::list_anime))
        .route("/anime/search", get(anime::search_anime))
        .route("/anime/{id}", get(anime::get_anime))
        .route("/system/health", get(system::health))
        .route("/system/health/ready", get(system::health_ready))
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(observability::get_metrics).with_state(state))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/is-admin", get(auth::is_admin))
        .route("/auth/password", put(auth::change_password))
        .route("/anime", post(anime::create_anime))
        .route("/anime/range", post(anime::create_anime_range))
        .route("/anime/{id}", put(anime::update_anime))
        .route("/anime/{id}", delete(anime::delete_anime))
        .route("/anime/favourites", get(favourites::list_favourites))
        .route("/anime/favourites/{id}", get(favourites::favourite_status))
        .route("/anime/favourites/{id}", post(favourites::add_favourite))
        .route(
            "/anime/favourites/{id}",
            delete(favourites::remove_favourite),
        )
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
