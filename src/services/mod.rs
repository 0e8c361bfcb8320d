pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, TokenGrant};
pub use auth_service_impl::SeaOrmAuthService;

pub mod catalog_service;
pub mod catalog_service_impl;
pub use catalog_service::{CatalogError, CatalogService};
pub use catalog_service_impl::SeaOrmCatalogService;

pub mod favourites_service;
pub mod favourites_service_impl;
pub use favourites_service::{FavouritesError, FavouritesService};
pub use favourites_service_impl::SeaOrmFavouritesService;

pub mod token;
pub use token::{AuthContext, Claims, TokenError, TokenIssuer};
