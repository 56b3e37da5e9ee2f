use std::sync::Arc;

use axum::{
    routing::{get, put},
    Router,
};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Admin routes, nested under `/api/admin`. Every handler requires the admin role.
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/suggestions", get(handlers::list_suggestions))
        .route("/suggestions/status-counts", get(handlers::status_counts))
        .route(
            "/suggestions/{id}",
            get(handlers::get_suggestion).patch(handlers::update_suggestion),
        )
        .route("/suggestions/{id}/assignee", put(handlers::assign_suggestion))
        .with_state(admin_service)
}
