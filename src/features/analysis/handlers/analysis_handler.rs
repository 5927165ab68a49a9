use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::analysis::dtos::{AnalyzeImageDto, AnalyzeImageResponseDto};
use crate::features::analysis::services::AnalysisService;
use crate::shared::multipart::read_image_form;
use crate::shared::types::ErrorResponse;

/// Suggest a category for an image from detected labels
#[utoipa::path(
    post,
    path = "/analyze-image",
    tag = "analysis",
    request_body(
        content = AnalyzeImageDto,
        content_type = "multipart/form-data",
    ),
    responses(
        (status = 200, description = "Suggested category and labels", body = AnalyzeImageResponseDto),
        (status = 400, description = "No image file provided", body = ErrorResponse),
        (status = 502, description = "Failed to analyze image", body = ErrorResponse)
    )
)]
pub async fn analyze_image(
    State(service): State<Arc<AnalysisService>>,
    multipart: Multipart,
) -> Result<Json<AnalyzeImageResponseDto>> {
    let form = read_image_form(multipart).await?;
    let image = form
        .image
        .ok_or_else(|| AppError::BadRequest("No image file provided".to_string()))?;
    image.check()?;

    Ok(Json(service.analyze(&image.data).await?))
}
