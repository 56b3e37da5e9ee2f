use crate::features::users::handlers;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/users/me", get(handlers::get_my_profile))
        .with_state(service)
}

/// Role administration, nested under `/api/admin`
pub fn admin_routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/users/{id}/role", put(handlers::set_user_role))
        .with_state(service)
}
