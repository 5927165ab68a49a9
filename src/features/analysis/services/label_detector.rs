use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use serde_json::json;

use crate::core::config::VisionConfig;
use crate::core::error::{AppError, Result};

/// Produces free-text labels for an image, most confident first
#[async_trait]
pub trait LabelDetector: Send + Sync {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<AnnotateImageResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateImageResponse {
    #[serde(default)]
    label_annotations: Vec<LabelAnnotation>,
    error: Option<AnnotateError>,
}

#[derive(Debug, Deserialize)]
struct LabelAnnotation {
    description: String,
}

#[derive(Debug, Deserialize)]
struct AnnotateError {
    #[serde(default)]
    message: String,
}

/// Google Cloud Vision `images:annotate` label detection over REST
pub struct GoogleVisionDetector {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    max_labels: usize,
}

impl GoogleVisionDetector {
    pub fn new(config: VisionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            api_key: config.api_key,
            max_labels: config.max_labels,
        })
    }

    fn parse_labels(response: AnnotateResponse) -> Result<Vec<String>> {
        let Some(first) = response.responses.into_iter().next() else {
            return Ok(Vec::new());
        };

        if let Some(error) = first.error {
            return Err(AppError::ExternalServiceError(format!(
                "Vision API error: {}",
                error.message
            )));
        }

        Ok(first
            .label_annotations
            .into_iter()
            .map(|l| l.description)
            .collect())
    }
}

#[async_trait]
impl LabelDetector for GoogleVisionDetector {
    async fn detect_labels(&self, image: &[u8]) -> Result<Vec<String>> {
        let body = json!({
            "requests": [{
                "image": { "content": STANDARD.encode(image) },
                "features": [{ "type": "LABEL_DETECTION", "maxResults": self.max_labels }]
            }]
        });

        tracing::debug!("Requesting labels for {} byte image", image.len());

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Vision request failed: {:?}", e);
                AppError::ExternalServiceError(format!("Vision request failed: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalServiceError(format!(
                "Vision API returned {}: {}",
                status, text
            )));
        }

        let parsed: AnnotateResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Vision response: {:?}", e);
            AppError::ExternalServiceError(format!("Failed to parse Vision response: {}", e))
        })?;

        Self::parse_labels(parsed)
    }
}
