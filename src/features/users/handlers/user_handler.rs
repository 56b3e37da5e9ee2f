use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{UpdateUserRoleDto, UserProfileResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserProfileResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No profile stored for this user")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_my_profile(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    let profile = service.get_profile(&user.sub).await?;
    Ok(Json(ApiResponse::success(Some(profile), None, None)))
}

/// Grant or revoke the admin role
#[utoipa::path(
    put,
    path = "/api/admin/users/{id}/role",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UpdateUserRoleDto,
    responses(
        (status = 200, description = "Role updated", body = ApiResponse<UserProfileResponseDto>),
        (status = 400, description = "Unknown role"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn set_user_role(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<UserService>>,
    Path(user_id): Path<String>,
    AppJson(dto): AppJson<UpdateUserRoleDto>,
) -> Result<Json<ApiResponse<UserProfileResponseDto>>> {
    tracing::info!("Admin {} changing role of {} to {}", admin.sub, user_id, dto.role);
    let profile = service.set_role(&user_id, dto.role).await?;
    Ok(Json(ApiResponse::success(
        Some(profile),
        Some("Role updated".to_string()),
        None,
    )))
}
