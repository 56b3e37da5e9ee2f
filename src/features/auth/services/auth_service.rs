use crate::core::error::{AppError, Result};
use crate::features::auth::clients::IdentityProvider;
use crate::features::auth::dtos::{
    AuthResponseDto, AuthUserDto, LoginRequestDto, MeResponseDto, PasswordResetConfirmDto,
    PasswordResetRequestDto, RefreshTokenRequestDto, RefreshTokenResponseDto, RegisterRequestDto,
};
use crate::features::auth::messages::{
    ACCOUNT_DISABLED, INCORRECT_CREDENTIALS, INVALID_RESET_CODE,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::TokenIssuer;
use crate::features::users::services::UserService;
use crate::shared::validation::validation_error;
use std::sync::Arc;
use validator::Validate;

/// Sign-up, sign-in and session lifecycle
pub struct AuthService {
    identity: Arc<dyn IdentityProvider>,
    tokens: Arc<dyn TokenIssuer>,
    users: Arc<UserService>,
}

impl AuthService {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        tokens: Arc<dyn TokenIssuer>,
        users: Arc<UserService>,
    ) -> Self {
        Self {
            identity,
            tokens,
            users,
        }
    }

    /// Create the account, store its profile with the `user` role, then sign in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        dto.validate().map_err(validation_error)?;

        let name = dto
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());

        let account = self
            .identity
            .create_user(&dto.email, &dto.password, name)
            .await?;

        let profile = self
            .users
            .create_profile(&account.id, name, Some(&dto.email))
            .await?;

        let tokens = self.tokens.issue(&account.id).await?;

        tracing::info!("Registered user {}", account.id);

        Ok(AuthResponseDto::new(
            tokens,
            AuthUserDto {
                id: account.id,
                name: profile.name,
                email: profile.email,
                role: profile.role,
            },
        ))
    }

    /// Verify credentials with the provider; tokens are issued only on success.
    ///
    /// Suspension is reported only to a caller who already proved the password.
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        dto.validate().map_err(validation_error)?;

        let account = self
            .identity
            .find_user_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized(INCORRECT_CREDENTIALS.to_string()))?;

        let password_valid = self
            .identity
            .verify_password(&account.id, &dto.password)
            .await?;

        if !password_valid {
            tracing::debug!("Rejected sign-in for {}", account.id);
            return Err(AppError::Unauthorized(INCORRECT_CREDENTIALS.to_string()));
        }

        if account.is_suspended {
            return Err(AppError::Forbidden(ACCOUNT_DISABLED.to_string()));
        }

        let role = self.users.resolve_role(&account.id).await;
        let tokens = self.tokens.issue(&account.id).await?;

        Ok(AuthResponseDto::new(
            tokens,
            AuthUserDto {
                id: account.id,
                name: account.name,
                email: account.email,
                role,
            },
        ))
    }

    pub async fn refresh_token(
        &self,
        dto: RefreshTokenRequestDto,
    ) -> Result<RefreshTokenResponseDto> {
        dto.validate().map_err(validation_error)?;

        let tokens = self.tokens.refresh(&dto.refresh_token).await?;
        Ok(tokens.into())
    }

    /// Revoke the refresh token. Provider failures are logged, never surfaced.
    pub async fn logout(&self, dto: RefreshTokenRequestDto) -> Result<()> {
        dto.validate().map_err(validation_error)?;

        if let Err(e) = self.tokens.revoke(&dto.refresh_token).await {
            tracing::warn!("Sign-out could not revoke refresh token: {}", e);
        }
        Ok(())
    }

    /// Send a reset code when the account exists. Always succeeds from the caller's view.
    pub async fn request_password_reset(&self, dto: PasswordResetRequestDto) -> Result<()> {
        dto.validate().map_err(validation_error)?;

        match self.identity.find_user_by_email(&dto.email).await {
            Ok(Some(_)) => {
                if let Err(e) = self.identity.send_reset_code(&dto.email).await {
                    tracing::warn!("Failed to send password reset code: {}", e);
                }
            }
            Ok(None) => tracing::debug!("Password reset requested for unknown email"),
            Err(e) => tracing::warn!("Password reset lookup failed: {}", e),
        }
        Ok(())
    }

    pub async fn confirm_password_reset(&self, dto: PasswordResetConfirmDto) -> Result<()> {
        dto.validate().map_err(validation_error)?;

        let account = self
            .identity
            .find_user_by_email(&dto.email)
            .await?
            .ok_or_else(|| AppError::BadRequest(INVALID_RESET_CODE.to_string()))?;

        if !self.identity.verify_reset_code(&dto.email, &dto.code).await? {
            return Err(AppError::BadRequest(INVALID_RESET_CODE.to_string()));
        }

        self.identity
            .update_password(&account.id, &dto.new_password)
            .await?;

        tracing::info!("Password reset completed for {}", account.id);
        Ok(())
    }

    pub fn current_user(&self, user: AuthenticatedUser) -> MeResponseDto {
        user.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::clients::IdentityUser;
    use crate::features::auth::messages::{EMAIL_IN_USE, WEAK_PASSWORD};
    use crate::features::users::models::Role;
    use crate::shared::test_helpers::{FakeIdentityProvider, FakeTokenIssuer, InMemoryUserRepository};
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    struct Harness {
        identity: Arc<FakeIdentityProvider>,
        tokens: Arc<FakeTokenIssuer>,
        users: Arc<InMemoryUserRepository>,
        service: AuthService,
    }

    fn harness() -> Harness {
        let identity = Arc::new(FakeIdentityProvider::default());
        let tokens = Arc::new(FakeTokenIssuer::default());
        let users = Arc::new(InMemoryUserRepository::default());
        let service = AuthService::new(
            identity.clone(),
            tokens.clone(),
            Arc::new(UserService::new(users.clone())),
        );
        Harness {
            identity,
            tokens,
            users,
            service,
        }
    }

    fn login(email: &str, password: &str) -> LoginRequestDto {
        LoginRequestDto {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn reset_request(email: &str) -> PasswordResetRequestDto {
        PasswordResetRequestDto {
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_issues_no_tokens() {
        let h = harness();
        let email: String = SafeEmail().fake();
        h.identity.add_account(&email, "correct-horse", false);

        let err = h
            .service
            .login(login(&email, "wrong-password"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(ref m) if m == INCORRECT_CREDENTIALS));
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_login_with_unknown_email_uses_same_message() {
        let h = harness();

        let err = h
            .service
            .login(login("nobody@example.com", "whatever"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(ref m) if m == INCORRECT_CREDENTIALS));
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_login_suspended_account() {
        let h = harness();
        h.identity.add_account("off@example.com", "secret1", true);

        let err = h
            .service
            .login(login("off@example.com", "secret1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(ref m) if m == ACCOUNT_DISABLED));
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_login_suspended_account_with_wrong_password_is_incorrect_credentials() {
        let h = harness();
        h.identity.add_account("off@example.com", "real-password", true);

        let err = h
            .service
            .login(login("off@example.com", "wrong-guess"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Unauthorized(ref m) if m == INCORRECT_CREDENTIALS));
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_login_success_carries_stored_role() {
        let h = harness();
        let account = h.identity.add_account("lead@example.com", "secret1", false);
        h.users.insert_role(&account.id, Role::Admin);

        let response = h
            .service
            .login(login("lead@example.com", "secret1"))
            .await
            .unwrap();

        assert_eq!(response.user.role, Role::Admin);
        assert_eq!(h.tokens.issued_count(), 1);
    }

    #[tokio::test]
    async fn test_register_stores_user_role_profile() {
        let h = harness();
        let name: String = Name().fake();

        let response = h
            .service
            .register(RegisterRequestDto {
                email: "new@example.com".to_string(),
                password: "secret1".to_string(),
                name: Some(name.clone()),
            })
            .await
            .unwrap();

        assert_eq!(response.user.role, Role::User);
        assert_eq!(response.user.name.as_deref(), Some(name.as_str()));
        assert_eq!(h.users.role_of(&response.user.id), Some(Role::User));
        assert_eq!(h.tokens.issued_count(), 1);
    }

    #[tokio::test]
    async fn test_register_short_password_never_reaches_provider() {
        let h = harness();

        let err = h
            .service
            .register(RegisterRequestDto {
                email: "new@example.com".to_string(),
                password: "123".to_string(),
                name: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref m) if m == WEAK_PASSWORD));
        assert!(h.identity.find_user_by_email("new@example.com").await.unwrap().is_none());
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_refresh_token_is_rejected_before_revocation() {
        let h = harness();

        let err = h
            .service
            .logout(RefreshTokenRequestDto {
                refresh_token: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(_)));
        assert!(h.tokens.revoked().is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let h = harness();
        h.identity.add_account("taken@example.com", "secret1", false);

        let err = h
            .service
            .register(RegisterRequestDto {
                email: "taken@example.com".to_string(),
                password: "secret1".to_string(),
                name: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m == EMAIL_IN_USE));
        assert_eq!(h.tokens.issued_count(), 0);
    }

    #[tokio::test]
    async fn test_logout_swallows_revocation_failure() {
        let h = harness();
        h.tokens.fail_revocation();

        h.service
            .logout(RefreshTokenRequestDto {
                refresh_token: "refresh-token".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(h.tokens.revoked(), vec!["refresh-token".to_string()]);
    }

    #[tokio::test]
    async fn test_password_reset_request_hides_unknown_email() {
        let h = harness();
        h.service
            .request_password_reset(reset_request("ghost@example.com"))
            .await
            .unwrap();
        assert!(h.identity.reset_codes_sent().is_empty());

        h.identity.add_account("real@example.com", "secret1", false);
        h.service
            .request_password_reset(reset_request("real@example.com"))
            .await
            .unwrap();
        assert_eq!(h.identity.reset_codes_sent(), vec!["real@example.com"]);
    }

    #[tokio::test]
    async fn test_confirm_password_reset_rejects_bad_code() {
        let h = harness();
        let account: IdentityUser = h.identity.add_account("real@example.com", "secret1", false);

        let err = h
            .service
            .confirm_password_reset(PasswordResetConfirmDto {
                email: "real@example.com".to_string(),
                code: "000000".to_string(),
                new_password: "new-secret".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        h.service
            .confirm_password_reset(PasswordResetConfirmDto {
                email: "real@example.com".to_string(),
                code: FakeIdentityProvider::VALID_CODE.to_string(),
                new_password: "new-secret".to_string(),
            })
            .await
            .unwrap();
        assert!(h.identity.password_matches(&account.id, "new-secret"));
    }
}
