//! Identity provider seam used by the auth service.

mod logto_auth_client;

pub use logto_auth_client::LogtoAuthClient;

use async_trait::async_trait;

use crate::core::error::Result;

/// Account as known to the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUser {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub is_suspended: bool,
}

/// Hosted account store: sign-up, credential checks and password resets
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `Conflict` when the email is taken
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<IdentityUser>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<IdentityUser>>;

    /// `Ok(false)` means the password is wrong
    async fn verify_password(&self, user_id: &str, password: &str) -> Result<bool>;

    /// Email a one-time verification code
    async fn send_reset_code(&self, email: &str) -> Result<()>;

    async fn verify_reset_code(&self, email: &str, code: &str) -> Result<bool>;

    async fn update_password(&self, user_id: &str, password: &str) -> Result<()>;
}
