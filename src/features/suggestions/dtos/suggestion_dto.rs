use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::suggestions::models::{
    StatusCounts, Suggestion, SuggestionCategory, SuggestionStatus,
};
use crate::shared::constants::{DESCRIPTION_MAX_LENGTH, TITLE_MAX_LENGTH, UNASSIGNED_PLACEHOLDER};
use crate::shared::validation::not_blank;

/// Request DTO for submitting a suggestion
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateSuggestionDto {
    #[validate(
        custom(function = "not_blank", message = "Title is required"),
        length(max = TITLE_MAX_LENGTH, message = "Title must be at most 200 characters")
    )]
    pub title: String,

    /// Unknown labels are rejected with 400
    pub category: SuggestionCategory,

    #[validate(
        custom(function = "not_blank", message = "Description is required"),
        length(max = DESCRIPTION_MAX_LENGTH, message = "Description must be at most 5000 characters")
    )]
    pub description: String,

    /// Id returned by `POST /api/files/upload`
    pub attachment_file_id: Option<Uuid>,
}

/// Response DTO for a suggestion
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SuggestionResponseDto {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub category: SuggestionCategory,
    pub description: String,
    pub status: SuggestionStatus,
    pub date: DateTime<Utc>,
    /// Assignee name, or "Unassigned"
    pub assigned_to: String,
    pub attachment_name: Option<String>,
    pub attachment_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Render an assignee for display
pub fn assignee_label(assigned_to: Option<&str>) -> String {
    assigned_to
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .unwrap_or(UNASSIGNED_PLACEHOLDER)
        .to_string()
}

impl From<Suggestion> for SuggestionResponseDto {
    fn from(s: Suggestion) -> Self {
        Self {
            assigned_to: assignee_label(s.assigned_to.as_deref()),
            id: s.id,
            user_id: s.user_id,
            title: s.title,
            category: s.category,
            description: s.description,
            status: s.status,
            date: s.date,
            attachment_name: s.attachment_name,
            attachment_url: s.attachment_url,
            updated_at: s.updated_at,
        }
    }
}

/// The caller's suggestions with their status tally
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MySuggestionsDto {
    pub items: Vec<SuggestionResponseDto>,
    pub counts: StatusCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::validation::collect_messages;
    use fake::faker::lorem::en::{Paragraph, Sentence};
    use fake::Fake;

    fn suggestion(assigned_to: Option<&str>) -> Suggestion {
        let now = Utc::now();
        Suggestion {
            id: Uuid::new_v4(),
            user_id: "u1".to_string(),
            title: Sentence(3..6).fake(),
            category: SuggestionCategory::Ergonomics,
            description: Paragraph(1..3).fake(),
            status: SuggestionStatus::Open,
            date: now,
            assigned_to: assigned_to.map(String::from),
            attachment_file_id: None,
            attachment_name: None,
            attachment_url: None,
            updated_at: now,
        }
    }

    #[test]
    fn test_missing_assignee_renders_placeholder() {
        let dto = SuggestionResponseDto::from(suggestion(None));
        assert_eq!(dto.assigned_to, "Unassigned");

        let dto = SuggestionResponseDto::from(suggestion(Some("   ")));
        assert_eq!(dto.assigned_to, "Unassigned");

        let dto = SuggestionResponseDto::from(suggestion(Some("Safety Officer")));
        assert_eq!(dto.assigned_to, "Safety Officer");
    }

    #[test]
    fn test_blank_fields_are_rejected() {
        let dto = CreateSuggestionDto {
            title: "   ".to_string(),
            category: SuggestionCategory::FireSafety,
            description: String::new(),
            attachment_file_id: None,
        };

        let errors = dto.validate().unwrap_err();
        assert_eq!(
            collect_messages(&errors),
            vec!["Description is required", "Title is required"]
        );
    }

    #[test]
    fn test_overlong_title_is_rejected() {
        let dto = CreateSuggestionDto {
            title: "x".repeat(201),
            category: SuggestionCategory::FireSafety,
            description: "Extinguisher missing".to_string(),
            attachment_file_id: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_unknown_category_fails_to_deserialize() {
        let result = serde_json::from_value::<CreateSuggestionDto>(serde_json::json!({
            "title": "Wet floor",
            "category": "Slippery Stuff",
            "description": "Near the canteen"
        }));
        assert!(result.is_err());
    }
}
