//! Object storage for uploaded attachments.

mod minio_client;

pub use minio_client::MinIOClient;

use async_trait::async_trait;

use crate::core::error::AppError;

/// Blob store holding attachment bytes
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Prefix every object key must start with
    fn key_prefix(&self) -> &str;

    /// Store the object and return its public URL
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> Result<String, AppError>;

    async fn remove(&self, key: &str) -> Result<(), AppError>;
}
