use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ErrorResponseDto;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("File upload failed: {0}")]
    UploadFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Persistence error: {0}")]
    Persistence(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Marker attached to responses of server-side failures
///
/// The request instrumentation reads it to tell handler failures apart from
/// answered requests without touching the response itself. Client errors
/// (400, 404, 405) are regular answers and carry no marker.
#[derive(Debug, Clone)]
pub struct HandlerFailure(pub String);

impl AppError {
    /// Whether the error is a failure of the service rather than of the request
    pub fn is_server_error(&self) -> bool {
        matches!(self, AppError::Persistence(_) | AppError::Internal(_))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let failure = self
            .is_server_error()
            .then(|| HandlerFailure(self.to_string()));

        let mut response = match self {
            AppError::Validation(msg) | AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponseDto::new(msg)),
            )
                .into_response(),
            AppError::UploadFailed(details) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponseDto::with_details("File upload failed", details)),
            )
                .into_response(),
            AppError::NotFound(_) => StatusCode::NOT_FOUND.into_response(),
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                Json(ErrorResponseDto::new("Method not allowed")),
            )
                .into_response(),
            AppError::Persistence(e) => {
                tracing::error!("Persistence error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };

        if let Some(failure) = failure {
            response.extensions_mut().insert(failure);
        }
        response
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
