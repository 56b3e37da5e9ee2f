use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthResponseDto, LoginRequestDto, MeResponseDto, PasswordResetConfirmDto,
    PasswordResetRequestDto, RefreshTokenRequestDto, RefreshTokenResponseDto, RegisterRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponseDto>>)> {
    let auth_response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(auth_response), None, None)),
    ))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<AuthResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account suspended"),
        (status = 429, description = "Too many attempts")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<AuthResponseDto>>> {
    let auth_response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(auth_response), None, None)))
}

/// Get current authenticated user info
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user retrieved successfully", body = ApiResponse<MeResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<AuthService>>,
) -> Result<Json<ApiResponse<MeResponseDto>>> {
    let user_data = service.current_user(user);
    Ok(Json(ApiResponse::success(Some(user_data), None, None)))
}

/// Refresh access token using refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Token refreshed successfully", body = ApiResponse<RefreshTokenResponseDto>),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "auth"
)]
pub async fn refresh_token(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<RefreshTokenResponseDto>>> {
    let response = service.refresh_token(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Sign out by revoking the refresh token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    request_body = RefreshTokenRequestDto,
    responses(
        (status = 200, description = "Signed out"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn logout(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RefreshTokenRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.logout(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Signed out".to_string()),
        None,
    )))
}

/// Email a password reset code
#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    request_body = PasswordResetRequestDto,
    responses(
        (status = 200, description = "Reset code sent if the account exists"),
        (status = 400, description = "Validation error")
    ),
    tag = "auth"
)]
pub async fn request_password_reset(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordResetRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.request_password_reset(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("If an account exists for that email, a reset code has been sent.".to_string()),
        None,
    )))
}

/// Set a new password using an emailed code
#[utoipa::path(
    post,
    path = "/api/auth/password-reset/confirm",
    request_body = PasswordResetConfirmDto,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Invalid code or weak password")
    ),
    tag = "auth"
)]
pub async fn confirm_password_reset(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<PasswordResetConfirmDto>,
) -> Result<Json<ApiResponse<()>>> {
    service.confirm_password_reset(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Password updated".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::auth::messages::{INCORRECT_CREDENTIALS, WEAK_PASSWORD};
    use crate::features::auth::routes;
    use crate::features::auth::services::AuthService;
    use crate::features::users::services::UserService;
    use crate::shared::test_helpers::{
        with_user_auth, FakeIdentityProvider, FakeTokenIssuer, InMemoryUserRepository,
    };
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn service(identity: Arc<FakeIdentityProvider>, tokens: Arc<FakeTokenIssuer>) -> Arc<AuthService> {
        let users = Arc::new(UserService::new(Arc::new(InMemoryUserRepository::default())));
        Arc::new(AuthService::new(identity, tokens, users))
    }

    #[tokio::test]
    async fn test_register_short_password_returns_friendly_message() {
        let tokens = Arc::new(FakeTokenIssuer::default());
        let app = routes::public_routes(service(Arc::default(), tokens.clone()));
        let server = TestServer::new(app).unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({ "email": "a@example.com", "password": "123" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"][0], WEAK_PASSWORD);
        assert_eq!(tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_login_wrong_password_returns_401() {
        let identity = Arc::new(FakeIdentityProvider::default());
        identity.add_account("worker@example.com", "secret1", false);
        let tokens = Arc::new(FakeTokenIssuer::default());
        let server =
            TestServer::new(routes::public_routes(service(identity, tokens.clone()))).unwrap();

        let response = server
            .post("/api/auth/login")
            .json(&json!({ "email": "worker@example.com", "password": "nope-nope" }))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: Value = response.json();
        assert_eq!(body["message"], INCORRECT_CREDENTIALS);
        assert_eq!(tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_register_returns_tokens_and_user_role() {
        let server = TestServer::new(routes::public_routes(service(
            Arc::default(),
            Arc::default(),
        )))
        .unwrap();

        let response = server
            .post("/api/auth/register")
            .json(&json!({ "email": "new@example.com", "password": "secret1", "name": "Riley" }))
            .await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["user"]["role"], "user");
        assert_eq!(body["data"]["token_type"], "Bearer");
    }

    #[tokio::test]
    async fn test_me_reports_role() {
        let app = with_user_auth(routes::protected_routes(service(
            Arc::default(),
            Arc::default(),
        )));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/api/auth/me").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["data"]["role"], "user");
        assert_eq!(body["data"]["is_admin"], false);
    }
}
