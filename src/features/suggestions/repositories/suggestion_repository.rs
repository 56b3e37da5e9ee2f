use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::suggestions::models::{
    NewSuggestion, Suggestion, SuggestionCategory, SuggestionChanges, SuggestionStatus,
};
use crate::shared::types::SortDirection;

/// Admin list filters; `None` matches everything
#[derive(Debug, Clone, Default)]
pub struct SuggestionFilter {
    pub status: Option<SuggestionStatus>,
    pub category: Option<SuggestionCategory>,
    pub user_id: Option<String>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    /// Inclusive lower bound on `date`
    pub date_from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `date`
    pub date_before: Option<DateTime<Utc>>,
}

impl SuggestionFilter {
    /// ILIKE pattern with wildcards in the user's text escaped
    pub fn search_pattern(&self) -> Option<String> {
        let term = self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let escaped = term
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        Some(format!("%{}%", escaped))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SuggestionSortField {
    #[default]
    Date,
    Status,
    Title,
}

impl SuggestionSortField {
    pub fn as_column(&self) -> &'static str {
        match self {
            SuggestionSortField::Date => "date",
            SuggestionSortField::Status => "status",
            SuggestionSortField::Title => "title",
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SuggestionSort {
    pub field: SuggestionSortField,
    pub direction: SortDirection,
}

/// Persistence for suggestions
#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    async fn create(&self, suggestion: NewSuggestion) -> Result<Suggestion>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Suggestion>>;

    /// Newest first
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Suggestion>>;

    /// One page plus the total number of matches
    async fn list(
        &self,
        filter: &SuggestionFilter,
        sort: SuggestionSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Suggestion>, i64)>;

    async fn update(&self, id: Uuid, changes: SuggestionChanges) -> Result<Option<Suggestion>>;

    async fn set_assignee(&self, id: Uuid, assigned_to: Option<String>)
        -> Result<Option<Suggestion>>;

    /// `(status, count)` for each status with at least one match
    async fn count_by_status(&self, filter: &SuggestionFilter)
        -> Result<Vec<(SuggestionStatus, i64)>>;
}

pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUGGESTION_COLUMNS: &str = "id, user_id, title, category, description, status, date, \
                                  assigned_to, attachment_file_id, attachment_name, \
                                  attachment_url, updated_at";

/// Shared WHERE clause; binds $1..$6 in `SuggestionFilter` field order
const FILTER_CLAUSE: &str = r#"
    WHERE ($1::suggestion_status IS NULL OR status = $1)
      AND ($2::suggestion_category IS NULL OR category = $2)
      AND ($3::text IS NULL OR user_id = $3)
      AND ($4::text IS NULL OR title ILIKE $4 OR description ILIKE $4)
      AND ($5::timestamptz IS NULL OR date >= $5)
      AND ($6::timestamptz IS NULL OR date < $6)
"#;

#[async_trait]
impl SuggestionRepository for PgSuggestionRepository {
    async fn create(&self, s: NewSuggestion) -> Result<Suggestion> {
        let sql = format!(
            r#"
            INSERT INTO suggestions (
                user_id, title, category, description, status,
                attachment_file_id, attachment_name, attachment_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        );

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(&s.user_id)
            .bind(&s.title)
            .bind(s.category)
            .bind(&s.description)
            .bind(s.status)
            .bind(s.attachment_file_id)
            .bind(&s.attachment_name)
            .bind(&s.attachment_url)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create suggestion for {}: {:?}", s.user_id, e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Suggestion>> {
        let sql = format!("SELECT {} FROM suggestions WHERE id = $1", SUGGESTION_COLUMNS);

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch suggestion {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Suggestion>> {
        let sql = format!(
            "SELECT {} FROM suggestions WHERE user_id = $1 ORDER BY date DESC, id DESC",
            SUGGESTION_COLUMNS
        );

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list suggestions for {}: {:?}", user_id, e);
                AppError::Database(e)
            })
    }

    async fn list(
        &self,
        filter: &SuggestionFilter,
        sort: SuggestionSort,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Suggestion>, i64)> {
        let search = filter.search_pattern();

        let count_sql = format!("SELECT COUNT(*) FROM suggestions {}", FILTER_CLAUSE);
        let total = sqlx::query_scalar::<_, i64>(&count_sql)
            .bind(filter.status)
            .bind(filter.category)
            .bind(filter.user_id.as_deref())
            .bind(search.as_deref())
            .bind(filter.date_from)
            .bind(filter.date_before)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count suggestions: {:?}", e);
                AppError::Database(e)
            })?;

        let direction = sort.direction.as_sql();
        let list_sql = format!(
            "SELECT {} FROM suggestions {} ORDER BY {} {}, id {} OFFSET $7 LIMIT $8",
            SUGGESTION_COLUMNS,
            FILTER_CLAUSE,
            sort.field.as_column(),
            direction,
            direction
        );
        let items = sqlx::query_as::<_, Suggestion>(&list_sql)
            .bind(filter.status)
            .bind(filter.category)
            .bind(filter.user_id.as_deref())
            .bind(search.as_deref())
            .bind(filter.date_from)
            .bind(filter.date_before)
            .bind(offset)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list suggestions: {:?}", e);
                AppError::Database(e)
            })?;

        Ok((items, total))
    }

    async fn update(&self, id: Uuid, changes: SuggestionChanges) -> Result<Option<Suggestion>> {
        let sql = format!(
            r#"
            UPDATE suggestions
            SET title = COALESCE($2, title),
                category = COALESCE($3, category),
                status = COALESCE($4, status),
                description = COALESCE($5, description),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        );

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(id)
            .bind(changes.title)
            .bind(changes.category)
            .bind(changes.status)
            .bind(changes.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update suggestion {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn set_assignee(
        &self,
        id: Uuid,
        assigned_to: Option<String>,
    ) -> Result<Option<Suggestion>> {
        let sql = format!(
            r#"
            UPDATE suggestions
            SET assigned_to = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SUGGESTION_COLUMNS
        );

        sqlx::query_as::<_, Suggestion>(&sql)
            .bind(id)
            .bind(assigned_to)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to assign suggestion {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn count_by_status(
        &self,
        filter: &SuggestionFilter,
    ) -> Result<Vec<(SuggestionStatus, i64)>> {
        let search = filter.search_pattern();
        let sql = format!(
            "SELECT status, COUNT(*) FROM suggestions {} GROUP BY status",
            FILTER_CLAUSE
        );

        sqlx::query_as::<_, (SuggestionStatus, i64)>(&sql)
            .bind(filter.status)
            .bind(filter.category)
            .bind(filter.user_id.as_deref())
            .bind(search.as_deref())
            .bind(filter.date_from)
            .bind(filter.date_before)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count suggestions by status: {:?}", e);
                AppError::Database(e)
            })
    }
}
