use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidateEmail, ValidationError};

use crate::features::auth::messages::{INVALID_EMAIL, WEAK_PASSWORD};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::IssuedTokens;
use crate::features::users::models::Role;
use crate::shared::constants::MIN_PASSWORD_LENGTH;

fn valid_email(value: &str) -> Result<(), ValidationError> {
    if value.validate_email() {
        return Ok(());
    }
    Err(ValidationError::new("email").with_message(Cow::Borrowed(INVALID_EMAIL)))
}

/// Passwords shorter than `MIN_PASSWORD_LENGTH` characters are rejected before reaching the provider
fn strong_password(value: &str) -> Result<(), ValidationError> {
    if value.chars().count() as u64 >= MIN_PASSWORD_LENGTH {
        return Ok(());
    }
    Err(ValidationError::new("weak_password").with_message(Cow::Borrowed(WEAK_PASSWORD)))
}

/// Request DTO for user registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequestDto {
    #[validate(custom(function = "valid_email"))]
    pub email: String,

    #[validate(custom(function = "strong_password"))]
    pub password: String,

    /// Display name shown to administrators
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,
}

/// Request DTO for user login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct LoginRequestDto {
    #[validate(custom(function = "valid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for token refresh and logout
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RefreshTokenRequestDto {
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Request DTO for starting a password reset
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequestDto {
    #[validate(custom(function = "valid_email"))]
    pub email: String,
}

/// Request DTO for completing a password reset
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct PasswordResetConfirmDto {
    #[validate(custom(function = "valid_email"))]
    pub email: String,

    #[validate(length(min = 1, message = "Verification code is required"))]
    pub code: String,

    #[validate(custom(function = "strong_password"))]
    pub new_password: String,
}

/// Response DTO for token refresh
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenResponseDto {
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    /// New refresh token (if rotated)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl From<IssuedTokens> for RefreshTokenResponseDto {
    fn from(tokens: IssuedTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            refresh_token: tokens.refresh_token,
        }
    }
}

/// Response DTO for register/login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub user: AuthUserDto,
}

impl AuthResponseDto {
    pub fn new(tokens: IssuedTokens, user: AuthUserDto) -> Self {
        Self {
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
            refresh_token: tokens.refresh_token,
            user,
        }
    }
}

/// User info included in auth responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

/// DTO for /api/auth/me
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub id: String,
    pub role: Role,
    pub is_admin: bool,
}

impl From<AuthenticatedUser> for MeResponseDto {
    fn from(user: AuthenticatedUser) -> Self {
        Self {
            is_admin: user.is_admin(),
            id: user.sub,
            role: user.role,
        }
    }
}
