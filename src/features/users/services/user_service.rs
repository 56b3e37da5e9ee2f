use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::users::dtos::UserProfileResponseDto;
use crate::features::users::models::Role;
use crate::features::users::repositories::UserRepository;

/// Role store backed by the `users` table
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Stored role, `None` when the user has no profile row
    pub async fn get_role(&self, user_id: &str) -> Result<Option<Role>> {
        self.repository.find_role(user_id).await
    }

    /// Role used for authorization on the current request.
    ///
    /// A missing profile and a failed lookup both resolve to `Role::User`.
    pub async fn resolve_role(&self, user_id: &str) -> Role {
        match self.get_role(user_id).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                tracing::debug!("No profile for {}, defaulting to user role", user_id);
                Role::User
            }
            Err(e) => {
                tracing::warn!(
                    "Role lookup failed for {}, defaulting to user role: {}",
                    user_id,
                    e
                );
                Role::User
            }
        }
    }

    /// Record the profile written at sign-up
    pub async fn create_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfileResponseDto> {
        let profile = self.repository.upsert_profile(user_id, name, email).await?;
        tracing::info!("Profile stored for user {} (role {})", profile.id, profile.role);
        Ok(profile.into())
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<UserProfileResponseDto> {
        self.repository
            .find_by_id(user_id)
            .await?
            .map(UserProfileResponseDto::from)
            .ok_or_else(|| AppError::NotFound("User profile not found".to_string()))
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<UserProfileResponseDto> {
        let profile = self.repository.set_role(user_id, role).await?;
        tracing::info!("Role of user {} set to {}", user_id, role);
        Ok(profile.into())
    }
}
