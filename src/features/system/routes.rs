use axum::{routing::get, Router};

use crate::features::system::handlers::{get_version, health_check};

pub fn routes() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(get_version))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::shared::test_helpers::body_json;

    #[tokio::test]
    async fn test_health_is_ok() {
        let response = routes()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_version_reports_crate_version() {
        let response = routes()
            .oneshot(Request::get("/version").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body.get("buildDate").is_some());
    }
}
