use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::LlmProvider;
use crate::core::config::LlmConfig;
use crate::core::error::AppError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageOut,
}

#[derive(Debug, Deserialize)]
struct ChatMessageOut {
    #[serde(default)]
    content: Option<String>,
}

impl ChatResponse {
    fn into_first_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|c| c.message.content)
    }
}

/// Client for any `/chat/completions` endpoint speaking the OpenAI wire format
pub struct OpenAiCompatibleClient {
    http_client: reqwest::Client,
    completions_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
}

impl OpenAiCompatibleClient {
    pub fn new(config: &LlmConfig) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build LLM HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            completions_url: completions_url(&config.base_url),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }
}

fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleClient {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
        };

        let mut request = self.http_client.post(&self.completions_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        tracing::debug!("Sending chat completion to model {}", self.model);

        let response = request.send().await.map_err(|e| {
            tracing::error!("LLM request failed: {}", e);
            AppError::ExternalServiceError(format!("LLM request failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!("LLM endpoint returned HTTP {}: {}", status, text);
            return Err(AppError::ExternalServiceError(format!(
                "LLM endpoint returned HTTP {}",
                status
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })?;

        parsed
            .into_first_text()
            .ok_or_else(|| AppError::ExternalServiceError("LLM returned no content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url_joins_once() {
        assert_eq!(
            completions_url("http://gateway:3000/openai/v1/"),
            "http://gateway:3000/openai/v1/chat/completions"
        );
        assert_eq!(
            completions_url("https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_first_choice_content_is_used() {
        let raw = r#"{"choices":[{"message":{"role":"assistant","content":"{\"summary\":\"ok\"}"}},{"message":{"content":"second"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_first_text().as_deref(), Some(r#"{"summary":"ok"}"#));
    }

    #[test]
    fn test_empty_choices_yield_nothing() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(parsed.into_first_text().is_none());
    }
}
