use async_trait::async_trait;
use sqlx::PgPool;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{Role, UserProfile};

/// Persistence for user profiles and their roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_role(&self, user_id: &str) -> Result<Option<Role>>;

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// Insert a profile with the `user` role, or refresh name/email of an existing one.
    /// An existing role is left untouched.
    async fn upsert_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfile>;

    /// Set a role, creating a bare profile when none exists yet
    async fn set_role(&self, user_id: &str, role: Role) -> Result<UserProfile>;
}

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_role(&self, user_id: &str) -> Result<Option<Role>> {
        sqlx::query_scalar::<_, Role>("SELECT role FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up role for {}: {:?}", user_id, e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, user_id: &str) -> Result<Option<UserProfile>> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, name, email, role, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch user {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn upsert_profile(
        &self,
        user_id: &str,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (id, name, email, role)
            VALUES ($1, $2, $3, 'user')
            ON CONFLICT (id) DO UPDATE
            SET name = COALESCE(EXCLUDED.name, users.name),
                email = COALESCE(EXCLUDED.email, users.email),
                updated_at = NOW()
            RETURNING id, name, email, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert profile for {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<UserProfile> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO users (id, role)
            VALUES ($1, $2)
            ON CONFLICT (id) DO UPDATE
            SET role = EXCLUDED.role,
                updated_at = NOW()
            RETURNING id, name, email, role, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to set role for {}: {:?}", user_id, e);
            AppError::Database(e)
        })
    }
}
