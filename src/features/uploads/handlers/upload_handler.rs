use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::{UploadImageDto, UploadResponseDto};
use crate::features::uploads::services::UploadService;
use crate::shared::multipart::read_image_form;
use crate::shared::types::ErrorResponse;

/// Store an image and a bounded JPEG thumbnail of it
///
/// Accepts multipart/form-data with:
/// - `image`: the image file (required)
/// - `ownerId`: optional owner identifier
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(
        content = UploadImageDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Image stored", body = UploadResponseDto),
        (status = 400, description = "Missing, oversized or unsupported image", body = ErrorResponse),
        (status = 500, description = "Failed to store image", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    State(service): State<Arc<UploadService>>,
    multipart: Multipart,
) -> Result<Json<UploadResponseDto>> {
    let form = read_image_form(multipart).await?;
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;

    let response = service.upload(image, form.owner_id.as_deref()).await?;
    Ok(Json(response))
}
