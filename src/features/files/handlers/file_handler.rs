use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::AppError;
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::files::dtos::{
    DeleteFileByUrlDto, DeleteFileResponseDto, FileResponseDto, UploadFileDto,
};
use crate::features::files::services::{FileService, UploadedFile};
use crate::shared::types::ApiResponse;
use crate::shared::validation::validation_error;

/// Upload a suggestion attachment
///
/// Accepts multipart/form-data with a single `file` field.
#[utoipa::path(
    post,
    path = "/api/files/upload",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = ApiResponse<FileResponseDto>),
        (status = 400, description = "Invalid file type or size"),
        (status = 401, description = "Authentication required"),
        (status = 413, description = "File too large"),
        (status = 502, description = "Storage unavailable")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_file(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponseDto>>), AppError> {
    let mut upload: Option<UploadedFile> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some("file") {
            debug!("Ignoring multipart field {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let filename = field.file_name().unwrap_or("unnamed").to_string();

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        upload = Some(UploadedFile {
            data: data.to_vec(),
            filename,
            content_type,
        });
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;
    let response = service.upload(&user.sub, upload).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(response), None, None)),
    ))
}

/// Delete a file by its URL
///
/// Only the owner of the file can delete it.
#[utoipa::path(
    delete,
    path = "/api/files",
    tag = "files",
    request_body = DeleteFileByUrlDto,
    responses(
        (status = 200, description = "File deleted successfully", body = ApiResponse<DeleteFileResponseDto>),
        (status = 400, description = "Invalid URL"),
        (status = 401, description = "Authentication required"),
        (status = 403, description = "Not authorized to delete this file"),
        (status = 404, description = "File not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_file_by_url(
    user: AuthenticatedUser,
    State(service): State<Arc<FileService>>,
    AppJson(dto): AppJson<DeleteFileByUrlDto>,
) -> Result<Json<ApiResponse<DeleteFileResponseDto>>, AppError> {
    dto.validate().map_err(validation_error)?;

    service.delete_by_url(&dto.url, &user.sub).await?;

    Ok(Json(ApiResponse::success(
        Some(DeleteFileResponseDto { deleted: true }),
        Some("File deleted successfully".to_string()),
        None,
    )))
}

#[cfg(test)]
mod tests {
    use crate::features::files::routes;
    use crate::features::files::services::FileService;
    use crate::shared::test_helpers::{
        with_user_auth, InMemoryFileRepository, InMemoryObjectStorage,
    };
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    fn server() -> TestServer {
        let service = Arc::new(FileService::new(
            Arc::new(InMemoryFileRepository::default()),
            Arc::new(InMemoryObjectStorage::default()),
        ));
        TestServer::new(with_user_auth(routes::routes(service))).unwrap()
    }

    #[tokio::test]
    async fn test_upload_text_file_returns_201() {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"loose railing near dock 4".to_vec())
                .file_name("notes.txt")
                .mime_type("text/plain"),
        );

        let response = server().post("/api/files/upload").multipart(form).await;

        response.assert_status(StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["data"]["original_filename"], "notes.txt");
        assert_eq!(body["data"]["content_type"], "text/plain");
    }

    #[tokio::test]
    async fn test_upload_without_file_is_rejected() {
        let form = MultipartForm::new().add_text("comment", "no file here");

        let response = server().post("/api/files/upload").multipart(form).await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
