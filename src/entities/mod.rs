pub mod prelude;

pub mod accounts;
pub mod anime;
pub mod favourites;
pub mod roles;
