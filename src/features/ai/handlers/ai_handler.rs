use axum::{extract::State, Json};
use std::sync::Arc;

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::ai::dtos::{CategorizeResponseDto, SuggestionTextDto, SummarizeResponseDto};
use crate::features::ai::services::AiService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::ApiResponse;

/// Suggest a category for draft suggestion text
#[utoipa::path(
    post,
    path = "/api/ai/categorize",
    request_body = SuggestionTextDto,
    responses(
        (status = 200, description = "Suggested category", body = ApiResponse<CategorizeResponseDto>),
        (status = 400, description = "Empty text"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Model endpoint unavailable")
    ),
    tag = "ai",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn categorize(
    _user: AuthenticatedUser,
    State(service): State<Arc<AiService>>,
    AppJson(dto): AppJson<SuggestionTextDto>,
) -> Result<Json<ApiResponse<CategorizeResponseDto>>> {
    let result = service.categorize(dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Summarize draft suggestion text
#[utoipa::path(
    post,
    path = "/api/ai/summarize",
    request_body = SuggestionTextDto,
    responses(
        (status = 200, description = "Summary", body = ApiResponse<SummarizeResponseDto>),
        (status = 400, description = "Empty text"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Model endpoint unavailable")
    ),
    tag = "ai",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn summarize(
    _user: AuthenticatedUser,
    State(service): State<Arc<AiService>>,
    AppJson(dto): AppJson<SuggestionTextDto>,
) -> Result<Json<ApiResponse<SummarizeResponseDto>>> {
    let result = service.summarize(dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::ai::routes;
    use crate::features::ai::services::AiService;
    use crate::shared::test_helpers::{with_user_auth, FakeLlmProvider};
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn server(llm: FakeLlmProvider, authenticated: bool) -> TestServer {
        let router = routes::routes(Arc::new(AiService::new(Arc::new(llm))));
        let router = if authenticated {
            with_user_auth(router)
        } else {
            router
        };
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_categorize_returns_label() {
        let server = server(
            FakeLlmProvider::replying(r#"{"category": "Ergonomics", "confidence": 0.8}"#),
            true,
        );

        let response = server
            .post("/api/ai/categorize")
            .json(&json!({ "text": "Desk is too low, back pain" }))
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["data"]["category"], "Ergonomics");
        assert_eq!(body["data"]["fallback"], false);
    }

    #[tokio::test]
    async fn test_empty_text_is_400() {
        let server = server(FakeLlmProvider::replying("{}"), true);

        let response = server
            .post("/api/ai/summarize")
            .json(&json!({ "text": "" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_model_outage_is_502() {
        let server = server(FakeLlmProvider::failing(), true);

        let response = server
            .post("/api/ai/summarize")
            .json(&json!({ "text": "Ladder missing rubber feet" }))
            .await;

        response.assert_status(StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_requires_authentication() {
        let server = server(FakeLlmProvider::replying("{}"), false);

        let response = server
            .post("/api/ai/categorize")
            .json(&json!({ "text": "Anything" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}
