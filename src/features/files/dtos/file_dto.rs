use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::files::models::FileRecord;

/// Multipart field carrying the uploaded file
pub const FILE_FIELD_NAME: &str = "profilePic";

/// Upload file request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to upload
    #[serde(rename = "profilePic")]
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// Response DTO for file operations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileResponseDto {
    /// Original filename as uploaded
    pub file_name: String,
    /// Unique identifier for the file
    pub id: String,
    /// Location of the stored content
    pub url: String,
    /// Day the file was uploaded
    #[schema(value_type = String, format = Date)]
    pub upload_date: NaiveDate,
}

impl From<FileRecord> for FileResponseDto {
    fn from(record: FileRecord) -> Self {
        Self {
            file_name: record.file_name,
            id: record.id,
            url: record.url,
            upload_date: record.upload_date,
        }
    }
}
