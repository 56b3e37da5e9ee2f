use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::suggestions::dtos::{
    CreateSuggestionDto, MySuggestionsDto, SuggestionResponseDto,
};
use crate::features::suggestions::services::SuggestionService;
use crate::shared::types::{ApiResponse, Meta};

/// Submit a safety suggestion
#[utoipa::path(
    post,
    path = "/api/suggestions",
    request_body = CreateSuggestionDto,
    responses(
        (status = 201, description = "Suggestion submitted", body = ApiResponse<SuggestionResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "suggestions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_suggestion(
    user: AuthenticatedUser,
    State(service): State<Arc<SuggestionService>>,
    AppJson(dto): AppJson<CreateSuggestionDto>,
) -> Result<(StatusCode, Json<ApiResponse<SuggestionResponseDto>>)> {
    let suggestion = service.create(&user, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(suggestion),
            Some("Suggestion submitted".to_string()),
            None,
        )),
    ))
}

/// List the caller's suggestions, newest first
#[utoipa::path(
    get,
    path = "/api/suggestions",
    responses(
        (status = 200, description = "Suggestions with status tally", body = ApiResponse<MySuggestionsDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "suggestions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_my_suggestions(
    user: AuthenticatedUser,
    State(service): State<Arc<SuggestionService>>,
) -> Result<Json<ApiResponse<MySuggestionsDto>>> {
    let mine = service.list_mine(&user).await?;
    let total = mine.items.len() as i64;
    Ok(Json(ApiResponse::success(
        Some(mine),
        None,
        Some(Meta { total }),
    )))
}

#[utoipa::path(
    get,
    path = "/api/suggestions/{id}",
    params(
        ("id" = Uuid, Path, description = "Suggestion ID")
    ),
    responses(
        (status = 200, description = "Suggestion found", body = ApiResponse<SuggestionResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Suggestion not found")
    ),
    tag = "suggestions",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_suggestion(
    user: AuthenticatedUser,
    State(service): State<Arc<SuggestionService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SuggestionResponseDto>>> {
    let suggestion = service.get(&user, id).await?;
    Ok(Json(ApiResponse::success(Some(suggestion), None, None)))
}

/// The fixed category labels
#[utoipa::path(
    get,
    path = "/api/suggestions/categories",
    responses(
        (status = 200, description = "Category labels", body = ApiResponse<Vec<String>>)
    ),
    tag = "suggestions"
)]
pub async fn list_categories(
    State(service): State<Arc<SuggestionService>>,
) -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(Some(service.categories()), None, None))
}
