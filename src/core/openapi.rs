use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::ErrorResponseDto;

#[derive(OpenApi)]
#[openapi(
    paths(
        files_handlers::upload_file,
        files_handlers::get_file,
        files_handlers::delete_file,
    ),
    components(
        schemas(
            files_dtos::UploadFileDto,
            files_dtos::FileResponseDto,
            ErrorResponseDto,
        )
    ),
    tags(
        (name = "files", description = "File upload, lookup and deletion"),
    ),
    info(
        title = "File Gateway API",
        version = "0.1.0",
        description = "API documentation for the file gateway",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
