use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{
    get_extension_from_content_type, is_mime_type_allowed, FileResponseDto, ALLOWED_MIME_TYPES,
    MAX_FILE_SIZE,
};
use crate::features::files::models::{File, NewFile};
use crate::features::files::repositories::FileRepository;
use crate::modules::storage::ObjectStorage;

/// File received from a multipart upload
#[derive(Debug)]
pub struct UploadedFile {
    pub data: Vec<u8>,
    pub filename: String,
    pub content_type: String,
}

pub struct FileService {
    repository: Arc<dyn FileRepository>,
    storage: Arc<dyn ObjectStorage>,
}

impl FileService {
    pub fn new(repository: Arc<dyn FileRepository>, storage: Arc<dyn ObjectStorage>) -> Self {
        Self {
            repository,
            storage,
        }
    }

    fn validate(upload: &UploadedFile) -> Result<()> {
        if upload.data.is_empty() {
            return Err(AppError::BadRequest("File is empty".to_string()));
        }

        if upload.data.len() > MAX_FILE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_FILE_SIZE / 1024 / 1024
            )));
        }

        if !is_mime_type_allowed(&upload.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                upload.content_type,
                ALLOWED_MIME_TYPES.join(", ")
            )));
        }

        Ok(())
    }

    /// `{prefix}/attachments/{user}/{uuid}.{ext}`
    fn object_key(&self, user_id: &str, content_type: &str) -> String {
        let extension = get_extension_from_content_type(content_type).unwrap_or("bin");
        format!(
            "{}/attachments/{}/{}.{}",
            self.storage.key_prefix(),
            user_id,
            Uuid::new_v4(),
            extension
        )
    }

    /// Store the object, then record its metadata
    pub async fn upload(&self, user_id: &str, upload: UploadedFile) -> Result<FileResponseDto> {
        Self::validate(&upload)?;

        let file_size = upload.data.len() as i64;
        let file_key = self.object_key(user_id, &upload.content_type);

        let url = self
            .storage
            .put(&file_key, upload.data, &upload.content_type)
            .await?;

        debug!("Stored attachment object {}", file_key);

        let file = self
            .repository
            .create(NewFile {
                file_key,
                original_filename: upload.filename,
                content_type: upload.content_type,
                file_size,
                url,
                uploaded_by: user_id.to_string(),
            })
            .await?;

        info!(
            "File metadata saved: id={}, key={}, size={}",
            file.id, file.file_key, file.file_size
        );

        Ok(file.into())
    }

    /// Active attachment uploaded by `user_id`
    pub async fn owned_attachment(&self, user_id: &str, file_id: Uuid) -> Result<File> {
        self.repository
            .find_active_by_id(file_id)
            .await?
            .filter(|f| f.uploaded_by == user_id)
            .ok_or_else(|| AppError::BadRequest("Attachment not found".to_string()))
    }

    /// Only the uploader may delete a file
    pub async fn delete_by_url(&self, url: &str, user_id: &str) -> Result<()> {
        let file = self
            .repository
            .find_active_by_url(url)
            .await?
            .ok_or_else(|| AppError::NotFound("File not found".to_string()))?;

        if file.uploaded_by != user_id {
            return Err(AppError::Forbidden(
                "You do not have permission to delete this file".to_string(),
            ));
        }

        self.storage.remove(&file.file_key).await?;
        self.repository.deactivate(file.id).await?;

        info!("File soft deleted: id={}, key={}", file.id, file.file_key);
        Ok(())
    }
}
