use axum::{
    extract::DefaultBodyLimit,
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::core::instrumentation::Interceptor;
use crate::core::middleware::instrument_requests;
use crate::features::files::handlers::{
    delete_file, file_id_required, get_file, method_not_allowed, upload_file,
};
use crate::features::files::services::FileService;

/// Create routes for the files feature
///
/// Every matched request, including rejected verbs, goes through the
/// request instrumentation. HEAD is registered explicitly so it is rejected
/// instead of being answered by the GET handlers.
pub fn routes(
    file_service: Arc<FileService>,
    interceptor: Interceptor,
    max_body_size: usize,
) -> Router {
    Router::new()
        .route(
            "/v1/file",
            post(upload_file)
                .get(file_id_required)
                .delete(file_id_required)
                .head(method_not_allowed)
                .fallback(method_not_allowed)
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .route(
            "/v1/file/{id}",
            get(get_file)
                .delete(delete_file)
                .head(method_not_allowed)
                .fallback(method_not_allowed),
        )
        .route_layer(from_fn_with_state(interceptor, instrument_requests))
        .with_state(file_service)
}
