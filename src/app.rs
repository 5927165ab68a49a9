use std::sync::Arc;

use axum::Router;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::core::middleware;
use crate::features::analysis::{routes as analysis_routes, AnalysisService};
use crate::features::sightings::{routes as sightings_routes, SightingService};
use crate::features::system::routes as system_routes;
use crate::features::uploads::{routes as uploads_routes, UploadService};

/// Services behind the public API
#[derive(Clone)]
pub struct AppServices {
    pub sightings: Arc<SightingService>,
    pub uploads: Arc<UploadService>,
    pub analysis: Arc<AnalysisService>,
}

/// All API routes without cross-cutting layers
pub fn api_routes(services: AppServices) -> Router {
    Router::new()
        .merge(sightings_routes::routes(services.sightings))
        .merge(uploads_routes::routes(services.uploads))
        .merge(analysis_routes::routes(services.analysis))
        .merge(system_routes::routes())
}

/// Wrap a router with CORS, tracing and request-id layers
pub fn with_layers(router: Router, cors_allowed_origins: Vec<String>) -> Router {
    router
        .layer(middleware::cors_layer(cors_allowed_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::shared::test_helpers::memory_services;

    #[tokio::test]
    async fn test_layers_echo_request_id() {
        let (services, _) = memory_services();
        let app = with_layers(api_routes(services), vec!["*".to_string()]);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let (services, _) = memory_services();
        let response = api_routes(services)
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
