use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::admin::{dtos as admin_dtos, handlers as admin_handlers};
use crate::features::ai::{dtos as ai_dtos, handlers as ai_handlers};
use crate::features::auth;
use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::features::suggestions::{
    dtos as suggestions_dtos, handlers as suggestions_handlers, models as suggestions_models,
};
use crate::features::users::{dtos as users_dtos, handlers as users_handlers, models as users_models};
use crate::shared::types::{ApiResponse, Meta, SortDirection};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::register,
        auth::handlers::login,
        auth::handlers::refresh_token,
        auth::handlers::logout,
        auth::handlers::request_password_reset,
        auth::handlers::confirm_password_reset,
        auth::handlers::get_me,
        // Users
        users_handlers::get_my_profile,
        users_handlers::set_user_role,
        // Files
        files_handlers::upload_file,
        files_handlers::delete_file_by_url,
        // Suggestions
        suggestions_handlers::list_categories,
        suggestions_handlers::create_suggestion,
        suggestions_handlers::list_my_suggestions,
        suggestions_handlers::get_suggestion,
        // Admin
        admin_handlers::list_suggestions,
        admin_handlers::status_counts,
        admin_handlers::get_suggestion,
        admin_handlers::update_suggestion,
        admin_handlers::assign_suggestion,
        // AI
        ai_handlers::categorize,
        ai_handlers::summarize,
    ),
    components(
        schemas(
            // Shared
            Meta,
            SortDirection,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::RegisterRequestDto,
            auth::dtos::LoginRequestDto,
            auth::dtos::RefreshTokenRequestDto,
            auth::dtos::RefreshTokenResponseDto,
            auth::dtos::PasswordResetRequestDto,
            auth::dtos::PasswordResetConfirmDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::MeResponseDto>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::RefreshTokenResponseDto>,
            // Users
            users_models::Role,
            users_dtos::UserProfileResponseDto,
            users_dtos::UpdateUserRoleDto,
            ApiResponse<users_dtos::UserProfileResponseDto>,
            // Files
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            files_dtos::DeleteFileByUrlDto,
            files_dtos::DeleteFileResponseDto,
            ApiResponse<files_dtos::FileResponseDto>,
            ApiResponse<files_dtos::DeleteFileResponseDto>,
            // Suggestions
            suggestions_models::SuggestionStatus,
            suggestions_models::SuggestionCategory,
            suggestions_models::StatusCounts,
            suggestions_dtos::CreateSuggestionDto,
            suggestions_dtos::SuggestionResponseDto,
            suggestions_dtos::MySuggestionsDto,
            ApiResponse<suggestions_dtos::SuggestionResponseDto>,
            ApiResponse<suggestions_dtos::MySuggestionsDto>,
            ApiResponse<Vec<String>>,
            // Admin
            admin_dtos::SuggestionSortBy,
            admin_dtos::UpdateSuggestionDto,
            admin_dtos::AssignSuggestionDto,
            ApiResponse<Vec<suggestions_dtos::SuggestionResponseDto>>,
            ApiResponse<suggestions_models::StatusCounts>,
            // AI
            ai_dtos::SuggestionTextDto,
            ai_dtos::CategorizeResponseDto,
            ai_dtos::SummarizeResponseDto,
            ApiResponse<ai_dtos::CategorizeResponseDto>,
            ApiResponse<ai_dtos::SummarizeResponseDto>,
        )
    ),
    tags(
        (name = "auth", description = "Registration, sign-in and session tokens"),
        (name = "users", description = "User profiles and roles"),
        (name = "files", description = "Attachment upload and removal"),
        (name = "suggestions", description = "Safety suggestions submitted by users"),
        (name = "admin", description = "Suggestion administration (admin only)"),
        (name = "ai", description = "Category and summary suggestions for draft text"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Safety Hub API",
        version = "0.1.0",
        description = "API documentation for Safety Hub",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
