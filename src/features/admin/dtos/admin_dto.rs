use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::features::suggestions::models::{
    SuggestionCategory, SuggestionChanges, SuggestionStatus,
};
use crate::features::suggestions::repositories::{
    SuggestionFilter, SuggestionSort, SuggestionSortField,
};
use crate::shared::constants::{DESCRIPTION_MAX_LENGTH, MAX_PAGE_SIZE, TITLE_MAX_LENGTH};
use crate::shared::types::{default_page, default_page_size, SortDirection};
use crate::shared::validation::not_blank;

/// Sort field for the admin suggestion list
#[derive(Debug, Clone, Copy, Default, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionSortBy {
    #[default]
    Date,
    Status,
    Title,
}

impl From<SuggestionSortBy> for SuggestionSortField {
    fn from(value: SuggestionSortBy) -> Self {
        match value {
            SuggestionSortBy::Date => SuggestionSortField::Date,
            SuggestionSortBy::Status => SuggestionSortField::Status,
            SuggestionSortBy::Title => SuggestionSortField::Title,
        }
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// `[from_date, to_date]` as whole UTC days
fn day_range(
    from_date: Option<NaiveDate>,
    to_date: Option<NaiveDate>,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = from_date.map(start_of_day);
    let before = to_date
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .map(start_of_day);
    (from, before)
}

/// Query params for listing suggestions
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct AdminSuggestionQuery {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    pub status: Option<SuggestionStatus>,
    pub category: Option<SuggestionCategory>,
    /// Submitter's user id
    pub user_id: Option<String>,
    /// Search in title or description
    pub search: Option<String>,
    /// Filter from date (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,
    /// Filter to date, inclusive (YYYY-MM-DD)
    pub to_date: Option<NaiveDate>,
    /// Sort by field (default: date)
    #[serde(default)]
    pub sort_by: SuggestionSortBy,
    /// Sort direction (default: desc)
    #[serde(default)]
    pub sort: SortDirection,
}

impl Default for AdminSuggestionQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
            status: None,
            category: None,
            user_id: None,
            search: None,
            from_date: None,
            to_date: None,
            sort_by: SuggestionSortBy::default(),
            sort: SortDirection::default(),
        }
    }
}

impl AdminSuggestionQuery {
    /// Pages past the end saturate to the largest offset, which yields an empty page
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn filter(&self) -> SuggestionFilter {
        let (date_from, date_before) = day_range(self.from_date, self.to_date);
        SuggestionFilter {
            status: self.status,
            category: self.category,
            user_id: self.user_id.clone(),
            search: self.search.clone(),
            date_from,
            date_before,
        }
    }

    pub fn sort(&self) -> SuggestionSort {
        SuggestionSort {
            field: self.sort_by.into(),
            direction: self.sort,
        }
    }
}

/// Query params for the status chart
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct StatusCountQuery {
    pub category: Option<SuggestionCategory>,
    pub user_id: Option<String>,
    pub search: Option<String>,
    /// Filter from date (YYYY-MM-DD)
    pub from_date: Option<NaiveDate>,
    /// Filter to date, inclusive (YYYY-MM-DD)
    pub to_date: Option<NaiveDate>,
}

impl StatusCountQuery {
    pub fn filter(&self) -> SuggestionFilter {
        let (date_from, date_before) = day_range(self.from_date, self.to_date);
        SuggestionFilter {
            status: None,
            category: self.category,
            user_id: self.user_id.clone(),
            search: self.search.clone(),
            date_from,
            date_before,
        }
    }
}

/// Admin edit of a suggestion. Absent fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateSuggestionDto {
    #[validate(
        custom(function = "not_blank", message = "Title cannot be blank"),
        length(max = TITLE_MAX_LENGTH, message = "Title must be at most 200 characters")
    )]
    pub title: Option<String>,

    pub category: Option<SuggestionCategory>,

    pub status: Option<SuggestionStatus>,

    #[validate(
        custom(function = "not_blank", message = "Description cannot be blank"),
        length(max = DESCRIPTION_MAX_LENGTH, message = "Description must be at most 5000 characters")
    )]
    pub description: Option<String>,
}

impl From<UpdateSuggestionDto> for SuggestionChanges {
    fn from(dto: UpdateSuggestionDto) -> Self {
        Self {
            title: dto.title.map(|t| t.trim().to_string()),
            category: dto.category,
            status: dto.status,
            description: dto.description.map(|d| d.trim().to_string()),
        }
    }
}

/// Reassign a suggestion. A blank or missing name clears the assignee.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AssignSuggestionDto {
    #[validate(length(max = 100, message = "Assignee must be at most 100 characters"))]
    pub assigned_to: Option<String>,
}

impl AssignSuggestionDto {
    pub fn normalized(&self) -> Option<String> {
        self.assigned_to
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .map(String::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_date_is_inclusive_day() {
        let query = AdminSuggestionQuery {
            from_date: NaiveDate::from_ymd_opt(2025, 3, 1),
            to_date: NaiveDate::from_ymd_opt(2025, 3, 31),
            ..Default::default()
        };

        let filter = query.filter();
        assert_eq!(
            filter.date_from.unwrap().to_rfc3339(),
            "2025-03-01T00:00:00+00:00"
        );
        assert_eq!(
            filter.date_before.unwrap().to_rfc3339(),
            "2025-04-01T00:00:00+00:00"
        );
    }

    #[test]
    fn test_pagination_is_clamped() {
        let query = AdminSuggestionQuery {
            page: 3,
            page_size: 500,
            ..Default::default()
        };
        assert_eq!(query.limit(), MAX_PAGE_SIZE);
        assert_eq!(query.offset(), 2 * MAX_PAGE_SIZE);
    }

    #[test]
    fn test_huge_page_does_not_overflow_offset() {
        let query = AdminSuggestionQuery {
            page: i64::MAX,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), i64::MAX);

        let query = AdminSuggestionQuery {
            page: i64::MIN,
            page_size: 10,
            ..Default::default()
        };
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_assignee_is_trimmed_and_blank_clears() {
        let dto = AssignSuggestionDto {
            assigned_to: Some("  Jordan Lee ".to_string()),
        };
        assert_eq!(dto.normalized().as_deref(), Some("Jordan Lee"));

        let dto = AssignSuggestionDto {
            assigned_to: Some("   ".to_string()),
        };
        assert!(dto.normalized().is_none());
    }

    #[test]
    fn test_blank_update_title_is_rejected() {
        let dto = UpdateSuggestionDto {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());

        let dto = UpdateSuggestionDto {
            status: Some(SuggestionStatus::Closed),
            ..Default::default()
        };
        assert!(dto.validate().is_ok());
    }
}
