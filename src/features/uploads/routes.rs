use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::uploads::handlers::upload_image;
use crate::features::uploads::services::UploadService;
use crate::shared::multipart::MAX_IMAGE_SIZE;

/// Create routes for the uploads feature
pub fn routes(service: Arc<UploadService>) -> Router {
    Router::new()
        .route(
            "/upload",
            // Allow for multipart overhead on top of the image itself
            post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}
