use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::users::models::Role;

/// Identity proven by a validated access token, before the role lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenIdentity {
    pub sub: String,
    /// Session UID (only present for interactive OIDC flows, not for token exchange)
    pub session_uid: Option<String>,
}

/// Authenticated user combined with the role resolved from the role store.
///
/// Attached to request extensions by the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_uid: Option<String>,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(identity: TokenIdentity, role: Role) -> Self {
        Self {
            sub: identity.sub,
            session_uid: identity.session_uid,
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
