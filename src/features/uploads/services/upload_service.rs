use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::core::config::ThumbnailConfig;
use crate::core::error::{AppError, Result};
use crate::features::uploads::dtos::UploadResponseDto;
use crate::features::uploads::services::thumbnail::make_thumbnail;
use crate::modules::storage::ObjectStorage;
use crate::shared::constants::ANONYMOUS_OWNER;
use crate::shared::multipart::ImagePart;
use crate::shared::validation::sanitize_filename;

/// Object keys for one upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadKeys {
    pub image: String,
    pub thumbnail: String,
}

impl UploadKeys {
    /// `<prefix>/<owner>/<millis>-<name>` and
    /// `<prefix>/<owner>/thumbnails/<millis>-<stem>.jpg`
    pub fn new(prefix: &str, owner_id: Option<&str>, file_name: &str, millis: i64) -> Self {
        let owner = owner_id
            .map(sanitize_filename)
            .unwrap_or_else(|| ANONYMOUS_OWNER.to_string());
        let name = sanitize_filename(file_name);
        let stem = Path::new(&name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("image")
            .to_string();

        let base = if prefix.is_empty() {
            owner
        } else {
            format!("{}/{}", prefix.trim_end_matches('/'), owner)
        };

        Self {
            image: format!("{}/{}-{}", base, millis, name),
            thumbnail: format!("{}/thumbnails/{}-{}.jpg", base, millis, stem),
        }
    }
}

/// Stores an image and its thumbnail
pub struct UploadService {
    storage: Arc<dyn ObjectStorage>,
    prefix: String,
    thumbnail: ThumbnailConfig,
}

impl UploadService {
    pub fn new(storage: Arc<dyn ObjectStorage>, prefix: String, thumbnail: ThumbnailConfig) -> Self {
        Self {
            storage,
            prefix,
            thumbnail,
        }
    }

    pub async fn upload(
        &self,
        image: ImagePart,
        owner_id: Option<&str>,
    ) -> Result<UploadResponseDto> {
        image.check()?;

        let keys = UploadKeys::new(
            &self.prefix,
            owner_id,
            &image.file_name,
            Utc::now().timestamp_millis(),
        );

        // Decoding and resizing is CPU bound
        let config = self.thumbnail;
        let thumbnail = tokio::task::spawn_blocking(move || {
            make_thumbnail(&image.data, &config).map(|thumb| (image, thumb))
        })
        .await
        .map_err(|e| AppError::Internal(format!("Thumbnail task failed: {}", e)))?;
        let (image, thumbnail) = thumbnail?;

        debug!(
            "Thumbnail for '{}' is {}x{}",
            keys.image, thumbnail.width, thumbnail.height
        );

        let image_url = self
            .storage
            .put(&keys.image, image.data, &image.content_type)
            .await?;
        let thumbnail_url = self
            .storage
            .put(&keys.thumbnail, thumbnail.data, "image/jpeg")
            .await?;

        info!("Stored upload '{}' with thumbnail", keys.image);
        Ok(UploadResponseDto {
            image_url,
            thumbnail_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::storage::MemoryObjectStorage;
    use crate::shared::test_helpers::png_bytes;

    #[test]
    fn test_keys_for_anonymous_upload() {
        let keys = UploadKeys::new("sightings", None, "my photo.png", 1700000000000);
        assert_eq!(keys.image, "sightings/anonymous/1700000000000-my_photo.png");
        assert_eq!(
            keys.thumbnail,
            "sightings/anonymous/thumbnails/1700000000000-my_photo.jpg"
        );
    }

    #[test]
    fn test_keys_sanitize_owner() {
        let keys = UploadKeys::new("sightings", Some("../alice"), "a.jpg", 1);
        assert_eq!(keys.image, "sightings/.._alice/1-a.jpg");
    }

    #[tokio::test]
    async fn test_upload_stores_original_and_thumbnail() {
        let storage = Arc::new(MemoryObjectStorage::new("http://files.local"));
        let service = UploadService::new(
            storage.clone(),
            "sightings".to_string(),
            ThumbnailConfig::default(),
        );

        let data = png_bytes(800, 600);
        let response = service
            .upload(
                ImagePart {
                    data: data.clone(),
                    file_name: "cat.png".to_string(),
                    content_type: "image/png".to_string(),
                },
                Some("user-1"),
            )
            .await
            .unwrap();

        assert!(response
            .image_url
            .starts_with("http://files.local/sightings/user-1/"));
        assert!(response.thumbnail_url.ends_with("-cat.jpg"));

        let keys = storage.keys().await;
        assert_eq!(keys.len(), 2);
        let original = storage
            .get(response.image_url.trim_start_matches("http://files.local/"))
            .await
            .unwrap();
        assert_eq!(original.data, data);
        assert_eq!(original.content_type, "image/png");
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type_without_storing() {
        let storage = Arc::new(MemoryObjectStorage::new("http://files.local"));
        let service = UploadService::new(
            storage.clone(),
            "sightings".to_string(),
            ThumbnailConfig::default(),
        );

        let err = service
            .upload(
                ImagePart {
                    data: b"%PDF-1.4".to_vec(),
                    file_name: "doc.pdf".to_string(),
                    content_type: "application/pdf".to_string(),
                },
                None,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::BadRequest(_)));
        assert!(storage.keys().await.is_empty());
    }
}
