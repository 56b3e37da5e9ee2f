use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::suggestions::models::SuggestionCategory;
use crate::shared::constants::DESCRIPTION_MAX_LENGTH;
use crate::shared::validation::not_blank;

/// Free text to run through the assistant
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SuggestionTextDto {
    #[validate(
        custom(function = "not_blank", message = "Suggestion text is required"),
        length(max = DESCRIPTION_MAX_LENGTH, message = "Suggestion text must be at most 5000 characters")
    )]
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorizeResponseDto {
    pub category: SuggestionCategory,
    /// Model confidence in [0, 1]
    pub confidence: f32,
    /// True when the model reply could not be used
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SummarizeResponseDto {
    pub summary: String,
    pub fallback: bool,
}
