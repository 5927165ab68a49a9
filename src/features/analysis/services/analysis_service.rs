use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::analysis::dtos::AnalyzeImageResponseDto;
use crate::features::analysis::models::categorize;
use crate::features::analysis::services::LabelDetector;

/// Labels returned to clients
const MAX_RETURNED_LABELS: usize = 10;

/// Suggests a category for an image
pub struct AnalysisService {
    detector: Arc<dyn LabelDetector>,
}

impl AnalysisService {
    pub fn new(detector: Arc<dyn LabelDetector>) -> Self {
        Self { detector }
    }

    pub async fn analyze(&self, image: &[u8]) -> Result<AnalyzeImageResponseDto> {
        let mut labels = self.detector.detect_labels(image).await.map_err(|e| {
            tracing::error!("Error analyzing image: {}", e);
            AppError::ExternalServiceError("Failed to analyze image".to_string())
        })?;

        let detected_type = categorize(&labels);
        labels.truncate(MAX_RETURNED_LABELS);

        tracing::debug!("Detected {} from {:?}", detected_type, labels);
        Ok(AnalyzeImageResponseDto {
            detected_type,
            labels,
        })
    }
}
