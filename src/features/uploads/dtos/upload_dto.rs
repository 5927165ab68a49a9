use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Upload image request for OpenAPI documentation
/// Note: the handler reads the multipart form directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// The image to store (jpeg, png, gif or webp)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub image: String,
    /// Optional owner identifier; omitted means anonymous
    #[schema(example = "user-123")]
    pub owner_id: Option<String>,
}

/// Response DTO for `POST /upload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponseDto {
    pub image_url: String,
    pub thumbnail_url: String,
}
