//! Safety suggestions submitted by users.
//!
//! | Method | Path | Access |
//! |---|---|---|
//! | GET | /api/suggestions/categories | public |
//! | POST | /api/suggestions | signed in |
//! | GET | /api/suggestions | signed in |
//! | GET | /api/suggestions/{id} | owner or admin |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use repositories::{PgSuggestionRepository, SuggestionRepository};
pub use services::SuggestionService;
