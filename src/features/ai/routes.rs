use crate::features::ai::handlers;
use crate::features::ai::services::AiService;
use axum::{routing::post, Router};
use std::sync::Arc;

pub fn routes(service: Arc<AiService>) -> Router {
    Router::new()
        .route("/api/ai/categorize", post(handlers::categorize))
        .route("/api/ai/summarize", post(handlers::summarize))
        .with_state(service)
}
