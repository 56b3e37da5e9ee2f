use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::admin::dtos::{
    AdminSuggestionQuery, AssignSuggestionDto, StatusCountQuery, UpdateSuggestionDto,
};
use crate::features::suggestions::dtos::SuggestionResponseDto;
use crate::features::suggestions::models::{StatusCounts, SuggestionChanges};
use crate::features::suggestions::SuggestionRepository;
use crate::shared::validation::validation_error;

/// Suggestion administration. Callers must already hold the admin role.
pub struct AdminService {
    suggestions: Arc<dyn SuggestionRepository>,
}

impl AdminService {
    pub fn new(suggestions: Arc<dyn SuggestionRepository>) -> Self {
        Self { suggestions }
    }

    pub async fn list_suggestions(
        &self,
        query: &AdminSuggestionQuery,
    ) -> Result<(Vec<SuggestionResponseDto>, i64)> {
        let (items, total) = self
            .suggestions
            .list(&query.filter(), query.sort(), query.offset(), query.limit())
            .await?;

        Ok((items.into_iter().map(Into::into).collect(), total))
    }

    pub async fn get_suggestion(&self, id: Uuid) -> Result<SuggestionResponseDto> {
        self.suggestions
            .find_by_id(id)
            .await?
            .map(SuggestionResponseDto::from)
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))
    }

    pub async fn update_suggestion(
        &self,
        id: Uuid,
        dto: UpdateSuggestionDto,
    ) -> Result<SuggestionResponseDto> {
        dto.validate().map_err(validation_error)?;

        let changes: SuggestionChanges = dto.into();
        if changes.is_empty() {
            return Err(AppError::BadRequest("No changes provided".to_string()));
        }

        let updated = self
            .suggestions
            .update(id, changes)
            .await?
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;

        tracing::info!("Suggestion {} updated (status {})", id, updated.status);
        Ok(updated.into())
    }

    pub async fn assign_suggestion(
        &self,
        id: Uuid,
        dto: AssignSuggestionDto,
    ) -> Result<SuggestionResponseDto> {
        dto.validate().map_err(validation_error)?;

        let assignee = dto.normalized();
        let updated = self
            .suggestions
            .set_assignee(id, assignee.clone())
            .await?
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))?;

        match assignee {
            Some(name) => tracing::info!("Suggestion {} assigned to {}", id, name),
            None => tracing::info!("Suggestion {} unassigned", id),
        }
        Ok(updated.into())
    }

    /// One grouped query folded into a tally with every status present
    pub async fn status_counts(&self, query: &StatusCountQuery) -> Result<StatusCounts> {
        let rows = self.suggestions.count_by_status(&query.filter()).await?;
        Ok(StatusCounts::from_pairs(rows))
    }
}
