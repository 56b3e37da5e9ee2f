use crate::features::suggestions::handlers;
use crate::features::suggestions::services::SuggestionService;
use axum::{routing::get, Router};
use std::sync::Arc;

pub fn public_routes(service: Arc<SuggestionService>) -> Router {
    Router::new()
        .route("/api/suggestions/categories", get(handlers::list_categories))
        .with_state(service)
}

pub fn routes(service: Arc<SuggestionService>) -> Router {
    Router::new()
        .route(
            "/api/suggestions",
            get(handlers::list_my_suggestions).post(handlers::create_suggestion),
        )
        .route("/api/suggestions/{id}", get(handlers::get_suggestion))
        .with_state(service)
}
