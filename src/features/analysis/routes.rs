use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::features::analysis::handlers::analyze_image;
use crate::features::analysis::services::AnalysisService;
use crate::shared::multipart::MAX_IMAGE_SIZE;

/// Create routes for the analysis feature
pub fn routes(service: Arc<AnalysisService>) -> Router {
    Router::new()
        .route(
            "/analyze-image",
            post(analyze_image).layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + 1024 * 1024)),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::shared::test_helpers::{
        body_json, multipart_request, png_bytes, FailingDetector, FormPart, StaticDetector,
    };

    #[tokio::test]
    async fn test_analyze_returns_detected_type() {
        let app = routes(Arc::new(AnalysisService::new(Arc::new(StaticDetector(vec![
            "Backpack".to_string(),
            "Luggage".to_string(),
        ])))));

        let request = multipart_request(
            "/analyze-image",
            &[FormPart::file("image", "bag.png", "image/png", png_bytes(8, 8))],
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({ "detectedType": "bags", "labels": ["Backpack", "Luggage"] })
        );
    }

    #[tokio::test]
    async fn test_analyze_without_image_is_400() {
        let app = routes(Arc::new(AnalysisService::new(Arc::new(StaticDetector(
            vec![],
        )))));
        let response = app
            .oneshot(multipart_request("/analyze-image", &[]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "No image file provided");
    }

    #[tokio::test]
    async fn test_analyze_failure_keeps_error_shape() {
        let app = routes(Arc::new(AnalysisService::new(Arc::new(FailingDetector))));
        let request = multipart_request(
            "/analyze-image",
            &[FormPart::file("image", "x.png", "image/png", png_bytes(8, 8))],
        );
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(body_json(response).await["error"], "Failed to analyze image");
    }
}
