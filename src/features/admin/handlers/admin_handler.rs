use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::{
    AdminSuggestionQuery, AssignSuggestionDto, StatusCountQuery, UpdateSuggestionDto,
};
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::features::suggestions::dtos::SuggestionResponseDto;
use crate::features::suggestions::models::StatusCounts;
use crate::shared::types::{ApiResponse, Meta};

/// List all suggestions (admin only)
#[utoipa::path(
    get,
    path = "/api/admin/suggestions",
    params(AdminSuggestionQuery),
    responses(
        (status = 200, description = "Paginated suggestions", body = ApiResponse<Vec<SuggestionResponseDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_suggestions(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Query(query): Query<AdminSuggestionQuery>,
) -> Result<Json<ApiResponse<Vec<SuggestionResponseDto>>>> {
    let (items, total) = service.list_suggestions(&query).await?;
    Ok(Json(ApiResponse::success(
        Some(items),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/admin/suggestions/{id}",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    responses(
        (status = 200, description = "Suggestion found", body = ApiResponse<SuggestionResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_suggestion(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SuggestionResponseDto>>> {
    let suggestion = service.get_suggestion(id).await?;
    Ok(Json(ApiResponse::success(Some(suggestion), None, None)))
}

/// Edit title, category, status or description
#[utoipa::path(
    patch,
    path = "/api/admin/suggestions/{id}",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    request_body = UpdateSuggestionDto,
    responses(
        (status = 200, description = "Suggestion updated", body = ApiResponse<SuggestionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_suggestion(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateSuggestionDto>,
) -> Result<Json<ApiResponse<SuggestionResponseDto>>> {
    tracing::debug!("Admin {} editing suggestion {}", admin.sub, id);
    let suggestion = service.update_suggestion(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(suggestion),
        Some("Suggestion updated".to_string()),
        None,
    )))
}

/// Set or clear the assignee
#[utoipa::path(
    put,
    path = "/api/admin/suggestions/{id}/assignee",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    request_body = AssignSuggestionDto,
    responses(
        (status = 200, description = "Assignee updated", body = ApiResponse<SuggestionResponseDto>),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn assign_suggestion(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<AssignSuggestionDto>,
) -> Result<Json<ApiResponse<SuggestionResponseDto>>> {
    let suggestion = service.assign_suggestion(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(suggestion),
        Some("Assignee updated".to_string()),
        None,
    )))
}

/// Per-status counts for the dashboard chart
#[utoipa::path(
    get,
    path = "/api/admin/suggestions/status-counts",
    params(StatusCountQuery),
    responses(
        (status = 200, description = "Counts per status", body = ApiResponse<StatusCounts>),
        (status = 403, description = "Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn status_counts(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    Query(query): Query<StatusCountQuery>,
) -> Result<Json<ApiResponse<StatusCounts>>> {
    let counts = service.status_counts(&query).await?;
    Ok(Json(ApiResponse::success(Some(counts), None, None)))
}
