use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{File, NewFile};

/// Metadata store for uploaded attachments
#[async_trait]
pub trait FileRepository: Send + Sync {
    async fn create(&self, file: NewFile) -> Result<File>;

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<File>>;

    async fn find_active_by_url(&self, url: &str) -> Result<Option<File>>;

    /// Soft delete
    async fn deactivate(&self, id: Uuid) -> Result<()>;
}

pub struct PgFileRepository {
    pool: PgPool,
}

impl PgFileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const FILE_COLUMNS: &str = "id, file_key, original_filename, content_type, file_size, url, \
                            uploaded_by, is_active, created_at, updated_at";

#[async_trait]
impl FileRepository for PgFileRepository {
    async fn create(&self, file: NewFile) -> Result<File> {
        let sql = format!(
            r#"
            INSERT INTO files (file_key, original_filename, content_type, file_size, url, uploaded_by)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            FILE_COLUMNS
        );

        sqlx::query_as::<_, File>(&sql)
            .bind(&file.file_key)
            .bind(&file.original_filename)
            .bind(&file.content_type)
            .bind(file.file_size)
            .bind(&file.url)
            .bind(&file.uploaded_by)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to save file metadata for {}: {:?}", file.file_key, e);
                AppError::Database(e)
            })
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<Option<File>> {
        let sql = format!(
            "SELECT {} FROM files WHERE id = $1 AND is_active = TRUE",
            FILE_COLUMNS
        );

        sqlx::query_as::<_, File>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_active_by_url(&self, url: &str) -> Result<Option<File>> {
        let sql = format!(
            "SELECT {} FROM files WHERE url = $1 AND is_active = TRUE",
            FILE_COLUMNS
        );

        sqlx::query_as::<_, File>(&sql)
            .bind(url)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn deactivate(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE files
            SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to deactivate file {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        Ok(())
    }
}
