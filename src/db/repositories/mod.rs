pub mod account;
pub mod anime;
pub mod favourite;
pub mod role;
