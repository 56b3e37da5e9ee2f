//! Language model access for the suggestion assistant.

mod openai_client;

pub use openai_client::OpenAiCompatibleClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Single-turn text completion
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one user prompt and return the assistant's reply text
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}
