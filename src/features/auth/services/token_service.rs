use crate::core::config::AuthTokenConfig;
use crate::core::error::{AppError, Result};
use crate::features::logto::LogtoTokenManager;
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Access/refresh token pair handed to clients
#[derive(Debug, Clone, Deserialize)]
pub struct IssuedTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
}

/// Issues, refreshes and revokes session tokens
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, user_id: &str) -> Result<IssuedTokens>;

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens>;

    async fn revoke(&self, refresh_token: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectTokenResponse {
    subject_token: String,
    expires_in: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSubjectTokenRequest<'a> {
    user_id: &'a str,
}

/// Token issuer backed by Logto subject-token exchange
pub struct TokenService {
    config: AuthTokenConfig,
    token_manager: Arc<LogtoTokenManager>,
    http_client: reqwest::Client,
}

impl TokenService {
    pub fn new(config: AuthTokenConfig, token_manager: Arc<LogtoTokenManager>) -> Self {
        Self {
            config,
            token_manager,
            http_client: reqwest::Client::new(),
        }
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.token_exchange_app_id, self.config.token_exchange_app_secret
        );
        format!("Basic {}", BASE64.encode(credentials.as_bytes()))
    }

    /// Create a short-lived subject token for the user via the Management API
    async fn create_subject_token(&self, user_id: &str) -> Result<String> {
        let m2m_token = self.token_manager.get_access_token().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to get M2M token: {}", e))
        })?;

        let url = format!("{}/api/subject-tokens", self.token_manager.api_base_url());

        tracing::debug!("Creating subject token for user: {}", user_id);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&m2m_token.access_token)
            .json(&CreateSubjectTokenRequest { user_id })
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to create subject token: {}", e);
                AppError::ExternalServiceError(format!("Failed to create subject token: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Subject token creation failed: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(format!(
                "Failed to create subject token: HTTP {}",
                status
            )));
        }

        let subject: SubjectTokenResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse subject token response: {}", e))
        })?;

        tracing::debug!("Subject token expires in {} seconds", subject.expires_in);

        Ok(subject.subject_token)
    }

    /// POST a grant to the OIDC token endpoint
    async fn token_request(&self, form: &[(&str, &str)], action: &str) -> Result<IssuedTokens> {
        let response = self
            .http_client
            .post(&self.config.oidc_token_url)
            .header("Authorization", self.basic_auth_header())
            .form(form)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to {}: {}", action, e);
                AppError::ExternalServiceError(format!("Failed to {}: {}", action, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Token endpoint rejected {}: HTTP {} - {}", action, status, body);

            if status.as_u16() == 400 || status.as_u16() == 401 {
                return Err(AppError::Unauthorized(
                    "Invalid or expired refresh token".to_string(),
                ));
            }
            return Err(AppError::ExternalServiceError(format!(
                "Failed to {}: HTTP {}",
                action, status
            )));
        }

        response.json::<IssuedTokens>().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse token response: {}", e))
        })
    }
}

#[async_trait]
impl TokenIssuer for TokenService {
    async fn issue(&self, user_id: &str) -> Result<IssuedTokens> {
        let subject_token = self.create_subject_token(user_id).await?;

        let form = [
            (
                "grant_type",
                "urn:ietf:params:oauth:grant-type:token-exchange",
            ),
            ("subject_token", subject_token.as_str()),
            (
                "subject_token_type",
                "urn:ietf:params:oauth:token-type:access_token",
            ),
            ("resource", self.config.api_resource.as_str()),
            ("scope", self.config.token_scopes.as_str()),
        ];

        let tokens = self.token_request(&form, "exchange subject token").await?;
        tracing::info!(
            "Issued tokens for {}, expires in {} seconds",
            user_id,
            tokens.expires_in
        );
        Ok(tokens)
    }

    async fn refresh(&self, refresh_token: &str) -> Result<IssuedTokens> {
        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("resource", self.config.api_resource.as_str()),
            ("scope", self.config.token_scopes.as_str()),
        ];

        let tokens = self.token_request(&form, "refresh token").await?;
        tracing::info!(
            "Token refresh successful, expires in {} seconds",
            tokens.expires_in
        );
        Ok(tokens)
    }

    async fn revoke(&self, refresh_token: &str) -> Result<()> {
        let response = self
            .http_client
            .post(&self.config.oidc_revocation_url)
            .header("Authorization", self.basic_auth_header())
            .form(&[
                ("token", refresh_token),
                ("token_type_hint", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Failed to revoke token: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::ExternalServiceError(format!(
                "Token revocation failed: HTTP {}",
                status
            )));
        }

        tracing::debug!("Refresh token revoked");
        Ok(())
    }
}
