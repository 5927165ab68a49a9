use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::sightings::models::Category;

/// Analyze image request for OpenAPI documentation
/// Note: the handler reads the multipart form directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct AnalyzeImageDto {
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
}

/// Response DTO for `POST /analyze-image`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageResponseDto {
    /// Suggested category; advisory only
    pub detected_type: Category,
    /// Detected labels, most confident first
    pub labels: Vec<String>,
}
