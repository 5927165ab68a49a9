use axum::{http::StatusCode, Json};

use crate::shared::types::VersionResponse;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up")),
    tag = "system"
)]
pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

/// Build version of the running server
#[utoipa::path(
    get,
    path = "/version",
    responses((status = 200, description = "Build information", body = VersionResponse)),
    tag = "system"
)]
pub async fn get_version() -> Json<VersionResponse> {
    Json(VersionResponse::current())
}
