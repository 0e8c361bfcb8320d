use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, CatalogService, FavouritesService, SeaOrmAuthService, SeaOrmCatalogService,
    SeaOrmFavouritesService, TokenIssuer,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub tokens: Arc<TokenIssuer>,

    pub auth_service: Arc<dyn AuthService>,

    pub catalog_service: Arc<dyn CatalogService>,

    pub favourites_service: Arc<dyn FavouritesService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        let tokens = Arc::new(TokenIssuer::new(
            config.auth.signing_secret(),
            config.auth.token_ttl_hours,
        ));

        let config_arc = Arc::new(RwLock::new(config));

        let auth_service = Arc::new(SeaOrmAuthService::new(store.clone(), tokens.clone()))
            as Arc<dyn AuthService + Send + Sync + 'static>;

        let catalog_service = Arc::new(SeaOrmCatalogService::new(store.clone()))
            as Arc<dyn CatalogService + Send + Sync + 'static>;

        let favourites_service = Arc::new(SeaOrmFavouritesService::new(store.clone()))
            as Arc<dyn FavouritesService + Send + Sync + 'static>;

        Ok(Self {
            config: config_arc,
            store,
            tokens,
            auth_service,
            catalog_service,
            favourites_service,
        })
    }

    pub async fn config(&self) -> Config {
        self.config.read().await.clone()
    }
}
