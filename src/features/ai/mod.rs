//! Category and summary suggestions for draft text, backed by a language model.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AiService;
