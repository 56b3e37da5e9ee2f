use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status matching the `suggestion_status` database enum.
///
/// Variant order is the enum's declaration order in Postgres, so `Ord` agrees with `ORDER BY status`.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Type,
    ToSchema,
)]
#[sqlx(type_name = "suggestion_status")]
pub enum SuggestionStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    #[sqlx(rename = "In Progress")]
    InProgress,
    Closed,
}

impl SuggestionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Open => "Open",
            SuggestionStatus::InProgress => "In Progress",
            SuggestionStatus::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Safety category matching the `suggestion_category` database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "suggestion_category")]
pub enum SuggestionCategory {
    #[serde(rename = "Fire Safety")]
    #[sqlx(rename = "Fire Safety")]
    FireSafety,
    #[serde(rename = "Electrical Safety")]
    #[sqlx(rename = "Electrical Safety")]
    ElectricalSafety,
    #[serde(rename = "Chemical Safety")]
    #[sqlx(rename = "Chemical Safety")]
    ChemicalSafety,
    #[serde(rename = "Fall Protection")]
    #[sqlx(rename = "Fall Protection")]
    FallProtection,
    #[serde(rename = "Machine Guarding")]
    #[sqlx(rename = "Machine Guarding")]
    MachineGuarding,
    #[serde(rename = "Personal Protective Equipment")]
    #[sqlx(rename = "Personal Protective Equipment")]
    PersonalProtectiveEquipment,
    #[serde(rename = "Hazard Communication")]
    #[sqlx(rename = "Hazard Communication")]
    HazardCommunication,
    Ergonomics,
    Other,
}

impl SuggestionCategory {
    pub const ALL: [SuggestionCategory; 9] = [
        SuggestionCategory::FireSafety,
        SuggestionCategory::ElectricalSafety,
        SuggestionCategory::ChemicalSafety,
        SuggestionCategory::FallProtection,
        SuggestionCategory::MachineGuarding,
        SuggestionCategory::PersonalProtectiveEquipment,
        SuggestionCategory::HazardCommunication,
        SuggestionCategory::Ergonomics,
        SuggestionCategory::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionCategory::FireSafety => "Fire Safety",
            SuggestionCategory::ElectricalSafety => "Electrical Safety",
            SuggestionCategory::ChemicalSafety => "Chemical Safety",
            SuggestionCategory::FallProtection => "Fall Protection",
            SuggestionCategory::MachineGuarding => "Machine Guarding",
            SuggestionCategory::PersonalProtectiveEquipment => "Personal Protective Equipment",
            SuggestionCategory::HazardCommunication => "Hazard Communication",
            SuggestionCategory::Ergonomics => "Ergonomics",
            SuggestionCategory::Other => "Other",
        }
    }

    /// Wire labels in display order
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(SuggestionCategory::as_str).collect()
    }

    /// Match a free-form label case-insensitively. Unknown labels become `Other`.
    pub fn normalize(label: &str) -> Self {
        let wanted = label.trim().trim_matches(|c| c == '"' || c == '.');
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .unwrap_or(SuggestionCategory::Other)
    }
}

impl std::fmt::Display for SuggestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Database model for a suggestion
#[derive(Debug, Clone, FromRow)]
pub struct Suggestion {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub category: SuggestionCategory,
    pub description: String,
    pub status: SuggestionStatus,
    pub date: DateTime<Utc>,
    pub assigned_to: Option<String>,
    pub attachment_file_id: Option<Uuid>,
    pub attachment_name: Option<String>,
    pub attachment_url: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Data for creating a new suggestion
#[derive(Debug, Clone)]
pub struct NewSuggestion {
    pub user_id: String,
    pub title: String,
    pub category: SuggestionCategory,
    pub description: String,
    pub status: SuggestionStatus,
    pub attachment_file_id: Option<Uuid>,
    pub attachment_name: Option<String>,
    pub attachment_url: Option<String>,
}

/// Admin edit; `None` leaves a field unchanged
#[derive(Debug, Clone, Default)]
pub struct SuggestionChanges {
    pub title: Option<String>,
    pub category: Option<SuggestionCategory>,
    pub status: Option<SuggestionStatus>,
    pub description: Option<String>,
}

impl SuggestionChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.category.is_none()
            && self.status.is_none()
            && self.description.is_none()
    }
}
