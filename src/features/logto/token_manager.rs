use crate::core::config::LogtoM2MConfig;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// Client-credentials token for the Logto Management API
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

struct TokenCache {
    token: TokenResponse,
    fetched_at: Instant,
}

impl TokenCache {
    fn is_usable(&self, margin: Duration) -> bool {
        self.fetched_at.elapsed() + margin < Duration::from_secs(self.token.expires_in)
    }
}

/// Caches the machine-to-machine token shared by every Management API caller
pub struct LogtoTokenManager {
    config: LogtoM2MConfig,
    client: reqwest::Client,
    cache: RwLock<Option<TokenCache>>,
    /// Refresh this long before the token expires
    refresh_margin: Duration,
}

impl LogtoTokenManager {
    pub fn new(config: LogtoM2MConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            cache: RwLock::new(None),
            refresh_margin: Duration::from_secs(60),
        }
    }

    pub async fn get_access_token(&self) -> Result<TokenResponse, TokenError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.is_usable(self.refresh_margin)) {
                return Ok(cached.token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        // Another task may have refreshed while we waited for the write lock
        if let Some(cached) = cache.as_ref().filter(|c| c.is_usable(self.refresh_margin)) {
            return Ok(cached.token.clone());
        }

        let token = self.fetch_token().await?;
        *cache = Some(TokenCache {
            token: token.clone(),
            fetched_at: Instant::now(),
        });
        Ok(token)
    }

    async fn fetch_token(&self) -> Result<TokenResponse, TokenError> {
        tracing::debug!("Fetching Logto M2M token from {}", self.config.token_url);

        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", &self.config.client_id),
                ("client_secret", &self.config.client_secret),
                ("scope", &self.config.scope),
                ("resource", &self.config.resource),
            ])
            .send()
            .await
            .map_err(|e| TokenError::FetchError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::FetchError(format!(
                "Token request failed: HTTP {} - {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::ParseError(e.to_string()))?;

        tracing::info!(
            "Fetched new Logto M2M token, expires in {} seconds",
            token.expires_in
        );

        Ok(token)
    }

    /// Base URL of the Logto Management API
    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Failed to fetch token: {0}")]
    FetchError(String),

    #[error("Failed to parse token response: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_respects_refresh_margin() {
        let cache = TokenCache {
            token: TokenResponse {
                access_token: "t".to_string(),
                expires_in: 3600,
            },
            fetched_at: Instant::now(),
        };
        assert!(cache.is_usable(Duration::from_secs(60)));
        assert!(!cache.is_usable(Duration::from_secs(3600)));
    }
}
