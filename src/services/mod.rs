pub mod auth;
pub mod compare;
