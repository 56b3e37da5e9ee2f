use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::{Role, UserProfile};

/// Profile of a user as stored in the role store
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserProfileResponseDto {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for UserProfileResponseDto {
    fn from(profile: UserProfile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            email: profile.email,
            role: profile.role,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}

/// Request DTO for changing a user's role
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserRoleDto {
    pub role: Role,
}
