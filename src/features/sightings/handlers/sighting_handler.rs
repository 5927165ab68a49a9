use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::sightings::dtos::{
    CreateSightingDto, CreateSightingResponseDto, SightingDetailResponseDto, SightingDto,
    SightingListResponseDto,
};
use crate::features::sightings::services::SightingService;
use crate::shared::types::ErrorResponse;

/// List every sighting, newest first
#[utoipa::path(
    get,
    path = "/sightings",
    responses(
        (status = 200, description = "All sightings", body = SightingListResponseDto),
        (status = 500, description = "Failed to fetch sightings", body = ErrorResponse)
    ),
    tag = "sightings"
)]
pub async fn list_sightings(
    State(service): State<Arc<SightingService>>,
) -> Result<Json<SightingListResponseDto>> {
    let sightings = service.list().await.map_err(|e| {
        tracing::error!("Error fetching sightings: {}", e);
        AppError::Internal("Failed to fetch sightings".to_string())
    })?;

    Ok(Json(SightingListResponseDto {
        sightings: sightings.into_iter().map(SightingDto::from).collect(),
    }))
}

/// Create a sighting
#[utoipa::path(
    post,
    path = "/sightings",
    request_body = CreateSightingDto,
    responses(
        (status = 201, description = "Sighting created", body = CreateSightingResponseDto),
        (status = 400, description = "Missing required fields or invalid values", body = ErrorResponse),
        (status = 500, description = "Failed to create sighting", body = ErrorResponse)
    ),
    tag = "sightings"
)]
pub async fn create_sighting(
    State(service): State<Arc<SightingService>>,
    AppJson(dto): AppJson<CreateSightingDto>,
) -> Result<(StatusCode, Json<CreateSightingResponseDto>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let sighting = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSightingResponseDto {
            id: sighting.id,
            success: true,
        }),
    ))
}

/// Fetch one sighting by id
#[utoipa::path(
    get,
    path = "/sightings/{id}",
    params(
        ("id" = String, Path, description = "Sighting ID")
    ),
    responses(
        (status = 200, description = "Sighting found", body = SightingDetailResponseDto),
        (status = 404, description = "Sighting not found", body = ErrorResponse)
    ),
    tag = "sightings"
)]
pub async fn get_sighting(
    State(service): State<Arc<SightingService>>,
    Path(id): Path<String>,
) -> Result<Json<SightingDetailResponseDto>> {
    // Ids that are not UUIDs can never have been issued by this store
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::NotFound("Sighting not found".to_string()))?;
    let sighting = service.get_by_id(id).await?;
    Ok(Json(SightingDetailResponseDto {
        sighting: sighting.into(),
    }))
}
