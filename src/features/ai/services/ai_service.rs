use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::ai::dtos::{CategorizeResponseDto, SuggestionTextDto, SummarizeResponseDto};
use crate::features::suggestions::models::SuggestionCategory;
use crate::modules::llm::LlmProvider;
use crate::shared::llm::{parse_with_fallback, LlmResponse};
use crate::shared::prompts::{render_categorize_prompt, render_summarize_prompt};
use crate::shared::validation::validation_error;

fn default_true() -> bool {
    true
}

/// Model output for categorization
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[schemars(title = "SuggestionCategorization")]
struct CategorizeLlmResponse {
    #[schemars(description = "Exactly one of the listed category labels")]
    category: String,

    #[schemars(description = "Confidence between 0 and 1")]
    #[serde(default)]
    confidence: f32,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    is_llm_success: bool,

    #[serde(default)]
    #[schemars(skip)]
    llm_error_message: Option<String>,
}

impl LlmResponse for CategorizeLlmResponse {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
        self.category = SuggestionCategory::Other.as_str().to_string();
        self.confidence = 0.0;
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }
}

/// Model output for summarization
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[schemars(title = "SuggestionSummary")]
struct SummarizeLlmResponse {
    #[schemars(description = "One or two sentence summary of the suggestion")]
    summary: String,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    is_llm_success: bool,

    #[serde(default)]
    #[schemars(skip)]
    llm_error_message: Option<String>,
}

impl LlmResponse for SummarizeLlmResponse {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.is_llm_success = false;
        self.llm_error_message = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.is_llm_success
    }
}

/// Clamp into [0, 1]; NaN counts as no confidence
fn clamp_confidence(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

/// Suggestion assistant: category and summary suggestions for draft text
pub struct AiService {
    llm: Arc<dyn LlmProvider>,
}

impl AiService {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    pub async fn categorize(&self, dto: SuggestionTextDto) -> Result<CategorizeResponseDto> {
        dto.validate().map_err(validation_error)?;

        let labels = SuggestionCategory::labels();
        let schema = CategorizeLlmResponse::json_schema_string();
        let prompt = render_categorize_prompt(&labels, &schema, dto.text.trim())
            .map_err(|e| AppError::Internal(format!("Failed to render prompt: {}", e)))?;

        let reply = self.llm.complete(&prompt).await?;
        let parsed = parse_with_fallback::<CategorizeLlmResponse>(&reply);

        if !parsed.is_success() {
            return Ok(CategorizeResponseDto {
                category: SuggestionCategory::Other,
                confidence: 0.0,
                fallback: true,
            });
        }

        let category = SuggestionCategory::normalize(&parsed.category);
        tracing::debug!(
            "Categorized suggestion as {} (model said {:?})",
            category,
            parsed.category
        );

        Ok(CategorizeResponseDto {
            category,
            confidence: clamp_confidence(parsed.confidence),
            fallback: false,
        })
    }

    pub async fn summarize(&self, dto: SuggestionTextDto) -> Result<SummarizeResponseDto> {
        dto.validate().map_err(validation_error)?;

        let schema = SummarizeLlmResponse::json_schema_string();
        let prompt = render_summarize_prompt(&schema, dto.text.trim())
            .map_err(|e| AppError::Internal(format!("Failed to render prompt: {}", e)))?;

        let reply = self.llm.complete(&prompt).await?;
        let parsed = parse_with_fallback::<SummarizeLlmResponse>(&reply);
        let summary = parsed.summary.trim();

        if parsed.is_success() && !summary.is_empty() {
            return Ok(SummarizeResponseDto {
                summary: summary.to_string(),
                fallback: false,
            });
        }

        // Plain-prose replies are still usable as a summary
        Ok(SummarizeResponseDto {
            summary: reply.trim().to_string(),
            fallback: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::FakeLlmProvider;

    fn text(t: &str) -> SuggestionTextDto {
        SuggestionTextDto {
            text: t.to_string(),
        }
    }

    #[tokio::test]
    async fn test_categorize_normalizes_label_and_clamps_confidence() {
        let llm = Arc::new(FakeLlmProvider::replying(
            r#"{"category": "fire safety", "confidence": 1.7}"#,
        ));
        let service = AiService::new(llm.clone());

        let result = service
            .categorize(text("Fire exit on level 2 is blocked by pallets"))
            .await
            .unwrap();

        assert_eq!(result.category, SuggestionCategory::FireSafety);
        assert_eq!(result.confidence, 1.0);
        assert!(!result.fallback);
        assert!(llm.prompts()[0].contains("Fire exit on level 2"));
    }

    #[tokio::test]
    async fn test_categorize_unknown_label_is_other() {
        let llm = Arc::new(FakeLlmProvider::replying(
            "```json\n{\"category\": \"Noise\", \"confidence\": 0.4}\n```",
        ));
        let service = AiService::new(llm);

        let result = service.categorize(text("It is loud")).await.unwrap();

        assert_eq!(result.category, SuggestionCategory::Other);
        assert!((result.confidence - 0.4).abs() < f32::EPSILON);
        assert!(!result.fallback);
    }

    #[tokio::test]
    async fn test_categorize_unparseable_reply_falls_back() {
        let llm = Arc::new(FakeLlmProvider::replying("I think this is about fire."));
        let service = AiService::new(llm);

        let result = service.categorize(text("Smoke near the boiler")).await.unwrap();

        assert_eq!(result.category, SuggestionCategory::Other);
        assert_eq!(result.confidence, 0.0);
        assert!(result.fallback);
    }

    #[tokio::test]
    async fn test_blank_text_is_rejected_without_calling_model() {
        let llm = Arc::new(FakeLlmProvider::replying("{}"));
        let service = AiService::new(llm.clone());

        let err = service.summarize(text("   ")).await.unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(llm.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_summarize_uses_raw_reply_when_not_json() {
        let llm = Arc::new(FakeLlmProvider::replying(
            "  Move the pallets away from the fire exit.  ",
        ));
        let service = AiService::new(llm);

        let result = service.summarize(text("Long description")).await.unwrap();

        assert_eq!(result.summary, "Move the pallets away from the fire exit.");
        assert!(result.fallback);
    }

    #[tokio::test]
    async fn test_summarize_parses_json_reply() {
        let llm = Arc::new(FakeLlmProvider::replying(
            r#"{"summary": "Clear the blocked exit.",}"#,
        ));
        let service = AiService::new(llm);

        let result = service.summarize(text("Long description")).await.unwrap();

        assert_eq!(result.summary, "Clear the blocked exit.");
        assert!(!result.fallback);
    }

    #[tokio::test]
    async fn test_transport_failure_is_bad_gateway() {
        let llm = Arc::new(FakeLlmProvider::failing());
        let service = AiService::new(llm);

        let err = service.categorize(text("Anything")).await.unwrap_err();

        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }

    #[test]
    fn test_clamp_confidence() {
        assert_eq!(clamp_confidence(-0.5), 0.0);
        assert_eq!(clamp_confidence(0.25), 0.25);
        assert_eq!(clamp_confidence(f32::NAN), 0.0);
    }
}
