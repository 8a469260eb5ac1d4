use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::core::error::AppError;
use crate::features::files::dtos::{FileResponseDto, UploadFileDto, FILE_FIELD_NAME};
use crate::features::files::services::{FileService, EMPTY_FILE_MESSAGE};
use crate::shared::types::ErrorResponseDto;

struct UploadedFile {
    data: Vec<u8>,
    file_name: String,
    content_type: String,
}

/// Read the file field out of the multipart body, ignoring other fields
async fn read_file_field(mut multipart: Multipart) -> Result<Option<UploadedFile>, AppError> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::UploadFailed(format!("Failed to read multipart data: {}", e))
    })? {
        if field.name() != Some(FILE_FIELD_NAME) {
            debug!("Ignoring unknown field: {:?}", field.name());
            continue;
        }

        let content_type = field
            .content_type()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());

        let data = field.bytes().await.map_err(|e| {
            debug!("Failed to read file bytes: {}", e);
            AppError::UploadFailed(format!("Failed to read file data: {}", e))
        })?;

        upload = Some(UploadedFile {
            data: data.to_vec(),
            file_name,
            content_type,
        });
    }

    Ok(upload)
}

/// Upload a file
///
/// Accepts multipart/form-data with the file in the `profilePic` field.
#[utoipa::path(
    post,
    path = "/v1/file",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "File upload form",
    ),
    responses(
        (status = 201, description = "File uploaded successfully", body = FileResponseDto),
        (status = 400, description = "File missing, empty, or upload failed", body = ErrorResponseDto),
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<FileResponseDto>), AppError> {
    info!("POST /v1/file - Received file upload request");

    let multipart = multipart.map_err(|e| {
        warn!("POST /v1/file - Not a multipart request: {}", e);
        AppError::Validation(EMPTY_FILE_MESSAGE.to_string())
    })?;

    let upload = read_file_field(multipart)
        .await?
        .filter(|upload| !upload.data.is_empty())
        .ok_or_else(|| {
            warn!("POST /v1/file - File is empty or not provided");
            AppError::Validation(EMPTY_FILE_MESSAGE.to_string())
        })?;

    let file = service
        .upload(upload.data, &upload.file_name, &upload.content_type)
        .await
        .map_err(|e| match e {
            AppError::Validation(_) => e,
            other => AppError::UploadFailed(other.to_string()),
        })?;

    info!("POST /v1/file - File uploaded successfully with ID: {}", file.id);
    Ok((StatusCode::CREATED, Json(file.into())))
}

/// Get a file's metadata by id
#[utoipa::path(
    get,
    path = "/v1/file/{id}",
    tag = "files",
    params(("id" = String, Path, description = "File id")),
    responses(
        (status = 200, description = "File found", body = FileResponseDto),
        (status = 404, description = "File not found")
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<Json<FileResponseDto>, AppError> {
    let file = service.get(&id).await?.ok_or_else(|| {
        warn!("GET /v1/file/{} - File not found", id);
        AppError::NotFound(format!("File not found: {}", id))
    })?;

    Ok(Json(file.into()))
}

/// Delete a file by id
#[utoipa::path(
    delete,
    path = "/v1/file/{id}",
    tag = "files",
    params(("id" = String, Path, description = "File id")),
    responses(
        (status = 204, description = "File deleted"),
        (status = 404, description = "File not found"),
        (status = 500, description = "Metadata could not be deleted")
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    info!("DELETE /v1/file/{} - Attempting to delete file", id);

    service.delete(&id).await?;

    info!("DELETE /v1/file/{} - File deleted successfully", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET or DELETE on the collection path without an id
pub async fn file_id_required() -> AppError {
    warn!("Request received without file ID");
    AppError::BadRequest("File ID is required".to_string())
}

pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
