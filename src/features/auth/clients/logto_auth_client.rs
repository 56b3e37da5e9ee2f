use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{IdentityProvider, IdentityUser};
use crate::core::error::{AppError, Result};
use crate::features::auth::messages::{EMAIL_IN_USE, TOO_MANY_ATTEMPTS, WEAK_PASSWORD};
use crate::features::logto::LogtoTokenManager;

/// User record returned by the Logto Management API
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogtoUserResponse {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    primary_email: Option<String>,
    #[serde(default)]
    is_suspended: bool,
}

impl From<LogtoUserResponse> for IdentityUser {
    fn from(user: LogtoUserResponse) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.primary_email,
            is_suspended: user.is_suspended,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserRequest<'a> {
    primary_email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct PasswordRequest<'a> {
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyCodeRequest<'a> {
    email: &'a str,
    verification_code: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LogtoErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
}

/// Logto Management API client for account operations
pub struct LogtoAuthClient {
    token_manager: Arc<LogtoTokenManager>,
    http_client: reqwest::Client,
}

impl LogtoAuthClient {
    pub fn new(token_manager: Arc<LogtoTokenManager>) -> Self {
        Self {
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    async fn m2m_token(&self) -> Result<String> {
        self.token_manager
            .get_access_token()
            .await
            .map(|token| token.access_token)
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to get M2M token: {}", e)))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.token_manager.api_base_url(), path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<reqwest::Response> {
        request.send().await.map_err(|e| {
            tracing::error!("Failed to {}: {}", action, e);
            AppError::ExternalServiceError(format!("Failed to {}: {}", action, e))
        })
    }

    /// Map an unexpected Logto status into an error, logging the body
    async fn unexpected(response: reqwest::Response, action: &str) -> AppError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Logto API error while trying to {}: HTTP {} - {}", action, status, body);

        if status == StatusCode::TOO_MANY_REQUESTS {
            return AppError::RateLimitExceeded(TOO_MANY_ATTEMPTS.to_string());
        }
        AppError::ExternalServiceError(format!("Logto API error: HTTP {}", status))
    }
}

/// Classify a rejected sign-up from its Logto error body
fn create_user_rejection(body: &str) -> Option<AppError> {
    let error = serde_json::from_str::<LogtoErrorResponse>(body).unwrap_or_default();

    if (error.code.starts_with("user.email") && error.code.contains("exist"))
        || error.code == "user.email_already_in_use"
        || error.message.contains("already")
    {
        return Some(AppError::Conflict(EMAIL_IN_USE.to_string()));
    }
    if error.code.starts_with("password") {
        return Some(AppError::Validation(WEAK_PASSWORD.to_string()));
    }
    None
}

#[async_trait]
impl IdentityProvider for LogtoAuthClient {
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<IdentityUser> {
        let token = self.m2m_token().await?;
        let body = CreateUserRequest {
            primary_email: email,
            password,
            name,
        };

        tracing::debug!("Creating user in Logto: {}", email);

        let response = self
            .send(
                self.http_client
                    .post(self.url("/api/users"))
                    .bearer_auth(&token)
                    .json(&body),
                "create user",
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            let user = response.json::<LogtoUserResponse>().await.map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to parse user response: {}", e))
            })?;
            tracing::info!("Created user {}", user.id);
            return Ok(user.into());
        }

        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            let text = response.text().await.unwrap_or_default();
            if let Some(err) = create_user_rejection(&text) {
                return Err(err);
            }
            tracing::warn!("Logto rejected new user: HTTP {} - {}", status, text);
            return Err(AppError::BadRequest("Unable to create account".to_string()));
        }

        Err(Self::unexpected(response, "create user").await)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>> {
        let token = self.m2m_token().await?;
        let url = format!(
            "{}?search={}",
            self.url("/api/users"),
            urlencoding::encode(email)
        );

        tracing::debug!("Searching for user by email: {}", email);

        let response = self
            .send(self.http_client.get(&url).bearer_auth(&token), "search users")
            .await?;

        if !response.status().is_success() {
            return Err(Self::unexpected(response, "search users").await);
        }

        let users = response
            .json::<Vec<LogtoUserResponse>>()
            .await
            .map_err(|e| {
                AppError::ExternalServiceError(format!("Failed to parse users response: {}", e))
            })?;

        // Search is fuzzy, so require an exact (case-insensitive) email match
        Ok(users
            .into_iter()
            .find(|u| {
                u.primary_email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .map(IdentityUser::from))
    }

    async fn verify_password(&self, user_id: &str, password: &str) -> Result<bool> {
        let token = self.m2m_token().await?;
        let url = self.url(&format!("/api/users/{}/password/verify", user_id));

        let response = self
            .send(
                self.http_client
                    .post(&url)
                    .bearer_auth(&token)
                    .json(&PasswordRequest { password }),
                "verify password",
            )
            .await?;

        match response.status() {
            StatusCode::NO_CONTENT | StatusCode::OK => Ok(true),
            StatusCode::UNPROCESSABLE_ENTITY => Ok(false),
            _ => Err(Self::unexpected(response, "verify password").await),
        }
    }

    async fn send_reset_code(&self, email: &str) -> Result<()> {
        let token = self.m2m_token().await?;

        let response = self
            .send(
                self.http_client
                    .post(self.url("/api/verification-codes"))
                    .bearer_auth(&token)
                    .json(&serde_json::json!({ "email": email })),
                "send verification code",
            )
            .await?;

        if !response.status().is_success() {
            return Err(Self::unexpected(response, "send verification code").await);
        }

        tracing::info!("Password reset code sent to {}", email);
        Ok(())
    }

    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<bool> {
        let token = self.m2m_token().await?;

        let response = self
            .send(
                self.http_client
                    .post(self.url("/api/verification-codes/verify"))
                    .bearer_auth(&token)
                    .json(&VerifyCodeRequest {
                        email,
                        verification_code: code,
                    }),
                "verify code",
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status == StatusCode::BAD_REQUEST || status == StatusCode::UNPROCESSABLE_ENTITY {
            return Ok(false);
        }
        Err(Self::unexpected(response, "verify code").await)
    }

    async fn update_password(&self, user_id: &str, password: &str) -> Result<()> {
        let token = self.m2m_token().await?;
        let url = self.url(&format!("/api/users/{}/password", user_id));

        let response = self
            .send(
                self.http_client
                    .patch(&url)
                    .bearer_auth(&token)
                    .json(&PasswordRequest { password }),
                "update password",
            )
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::info!("Password updated for user {}", user_id);
            return Ok(());
        }
        if status == StatusCode::UNPROCESSABLE_ENTITY || status == StatusCode::BAD_REQUEST {
            return Err(AppError::Validation(WEAK_PASSWORD.to_string()));
        }
        Err(Self::unexpected(response, "update password").await)
    }
}
