use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::services::FileService;
use crate::features::suggestions::dtos::{
    CreateSuggestionDto, MySuggestionsDto, SuggestionResponseDto,
};
use crate::features::suggestions::models::{
    NewSuggestion, StatusCounts, SuggestionCategory, SuggestionStatus,
};
use crate::features::suggestions::repositories::SuggestionRepository;
use crate::shared::validation::validation_error;

/// Submission and tracking of a user's own suggestions
pub struct SuggestionService {
    repository: Arc<dyn SuggestionRepository>,
    files: Arc<FileService>,
}

impl SuggestionService {
    pub fn new(repository: Arc<dyn SuggestionRepository>, files: Arc<FileService>) -> Self {
        Self { repository, files }
    }

    /// Persist one new suggestion with status `Open`
    pub async fn create(
        &self,
        user: &AuthenticatedUser,
        dto: CreateSuggestionDto,
    ) -> Result<SuggestionResponseDto> {
        dto.validate().map_err(validation_error)?;

        let attachment = match dto.attachment_file_id {
            Some(file_id) => Some(self.files.owned_attachment(&user.sub, file_id).await?),
            None => None,
        };

        let suggestion = self
            .repository
            .create(NewSuggestion {
                user_id: user.sub.clone(),
                title: dto.title.trim().to_string(),
                category: dto.category,
                description: dto.description.trim().to_string(),
                status: SuggestionStatus::Open,
                attachment_file_id: attachment.as_ref().map(|f| f.id),
                attachment_name: attachment.as_ref().map(|f| f.original_filename.clone()),
                attachment_url: attachment.map(|f| f.url),
            })
            .await?;

        tracing::info!(
            "Suggestion {} submitted by {} ({})",
            suggestion.id,
            user.sub,
            suggestion.category
        );

        Ok(suggestion.into())
    }

    /// The caller's suggestions, newest first, with their tally
    pub async fn list_mine(&self, user: &AuthenticatedUser) -> Result<MySuggestionsDto> {
        let suggestions = self.repository.list_by_user(&user.sub).await?;
        let counts: StatusCounts = suggestions.iter().map(|s| s.status).collect();

        Ok(MySuggestionsDto {
            items: suggestions.into_iter().map(Into::into).collect(),
            counts,
        })
    }

    /// Readable by its owner and by admins. Anyone else gets 404.
    pub async fn get(&self, user: &AuthenticatedUser, id: Uuid) -> Result<SuggestionResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .filter(|s| s.user_id == user.sub || user.is_admin())
            .map(SuggestionResponseDto::from)
            .ok_or_else(|| AppError::NotFound("Suggestion not found".to_string()))
    }

    pub fn categories(&self) -> Vec<&'static str> {
        SuggestionCategory::labels()
    }
}
