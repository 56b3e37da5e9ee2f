pub mod admin;
pub mod ai;
pub mod auth;
pub mod files;
pub mod logto;
pub mod suggestions;
pub mod users;
