use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;

/// Custom JSON extractor that provides consistent error responses
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppJsonRejection;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(value) => Ok(Self(value.0)),
            Err(rejection) => Err(AppJsonRejection(rejection)),
        }
    }
}

pub struct AppJsonRejection(JsonRejection);

impl IntoResponse for AppJsonRejection {
    fn into_response(self) -> Response {
        let message = match self.0 {
            // Missing or mistyped fields land here
            JsonRejection::JsonDataError(err) => format!("Missing required fields: {}", err),
            JsonRejection::JsonSyntaxError(err) => format!("Invalid JSON syntax: {}", err),
            JsonRejection::MissingJsonContentType(err) => {
                format!("Missing JSON content type: {}", err)
            }
            _ => "Failed to parse JSON body".to_string(),
        };

        AppError::BadRequest(message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use serde::Deserialize;

    use crate::shared::test_helpers::body_json;

    #[derive(Debug, Deserialize)]
    struct Point {
        #[allow(dead_code)]
        latitude: f64,
    }

    async fn extract(content_type: Option<&str>, body: &str) -> Response {
        let mut builder = axum::http::Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();

        match AppJson::<Point>::from_request(request, &()).await {
            Ok(_) => StatusCode::OK.into_response(),
            Err(rejection) => rejection.into_response(),
        }
    }

    #[tokio::test]
    async fn test_rejections_use_error_envelope() {
        let response = extract(Some("application/json"), "{}").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing required fields"));

        let response = extract(Some("application/json"), "{").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = extract(None, r#"{"latitude": 1.0}"#).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Missing JSON content type"));
    }

    #[tokio::test]
    async fn test_valid_body_extracts() {
        let response = extract(Some("application/json"), r#"{"latitude": 1.0}"#).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
