pub use super::accounts::Entity as Accounts;
pub use super::anime::Entity as Anime;
pub use super::favourites::Entity as Favourites;
pub use super::roles::Entity as Roles;
