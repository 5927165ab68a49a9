use utoipa::{Modify, OpenApi};

use crate::features::analysis::{dtos as analysis_dtos, handlers as analysis_handlers};
use crate::features::sightings::{
    dtos as sightings_dtos, handlers as sightings_handlers, models as sightings_models,
};
use crate::features::system::handlers as system_handlers;
use crate::features::uploads::{dtos as uploads_dtos, handlers as uploads_handlers};
use crate::shared::types::{ErrorResponse, VersionResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Sightings
        sightings_handlers::list_sightings,
        sightings_handlers::create_sighting,
        sightings_handlers::get_sighting,
        // Uploads
        uploads_handlers::upload_image,
        // Analysis
        analysis_handlers::analyze_image,
        // System
        system_handlers::health_check,
        system_handlers::get_version,
    ),
    components(
        schemas(
            ErrorResponse,
            VersionResponse,
            sightings_models::Category,
            sightings_models::LocationSource,
            sightings_dtos::CreateSightingDto,
            sightings_dtos::SightingDto,
            sightings_dtos::SightingListResponseDto,
            sightings_dtos::SightingDetailResponseDto,
            sightings_dtos::CreateSightingResponseDto,
            uploads_dtos::UploadImageDto,
            uploads_dtos::UploadResponseDto,
            analysis_dtos::AnalyzeImageDto,
            analysis_dtos::AnalyzeImageResponseDto,
        )
    ),
    tags(
        (name = "sightings", description = "Anonymous sighting reports"),
        (name = "uploads", description = "Image upload and thumbnailing"),
        (name = "analysis", description = "Category suggestion from image labels"),
        (name = "system", description = "Health and build information"),
    ),
    info(
        title = "GaiGi API",
        version = "0.1.0",
        description = "API documentation for GaiGi",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/sightings",
            "/sightings/{id}",
            "/upload",
            "/analyze-image",
            "/health",
            "/version",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier_overrides_title() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Staging".to_string(),
            version: "9.9.9".to_string(),
            description: "staging build".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Staging");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("staging build"));
    }
}
