pub mod anime;
pub mod role;
