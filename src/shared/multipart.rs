use axum::extract::Multipart;
use tracing::debug;

use crate::core::error::AppError;

/// Allowed MIME types for image uploads
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Maximum image size in bytes (10 MB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

pub fn is_image_type_allowed(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();
    // image/jpg shows up from some clients
    let essence = if essence == "image/jpg" {
        "image/jpeg".to_string()
    } else {
        essence
    };
    ALLOWED_IMAGE_TYPES.contains(&essence.as_str())
}

/// One image file taken from a multipart form
#[derive(Debug, Clone)]
pub struct ImagePart {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// The fields the image endpoints understand
#[derive(Debug, Default)]
pub struct ImageForm {
    pub image: Option<ImagePart>,
    pub owner_id: Option<String>,
}

/// Read an image form: `image` (or `file`) plus an optional `ownerId`/`userId`
pub async fn read_image_form(mut multipart: Multipart) -> Result<ImageForm, AppError> {
    let mut form = ImageForm::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "image" | "file" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "image".to_string());

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read file bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read file data: {}", e))
                })?;

                form.image = Some(ImagePart {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            }
            "ownerId" | "userId" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read {} field: {}", field_name, e))
                })?;
                let text = text.trim();
                if !text.is_empty() {
                    form.owner_id = Some(text.to_string());
                }
            }
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    Ok(form)
}

impl ImagePart {
    /// Reject empty, oversized or non-image payloads
    pub fn check(&self) -> Result<(), AppError> {
        if self.data.is_empty() {
            return Err(AppError::BadRequest("Image file is empty".to_string()));
        }
        if self.data.len() > MAX_IMAGE_SIZE {
            return Err(AppError::BadRequest(format!(
                "File too large. Maximum size is {} MB",
                MAX_IMAGE_SIZE / 1024 / 1024
            )));
        }
        if !is_image_type_allowed(&self.content_type) {
            return Err(AppError::BadRequest(format!(
                "File type '{}' is not allowed. Allowed types: {}",
                self.content_type,
                ALLOWED_IMAGE_TYPES.join(", ")
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn part(content_type: &str, len: usize) -> ImagePart {
        ImagePart {
            data: vec![0; len],
            file_name: "a.jpg".to_string(),
            content_type: content_type.to_string(),
        }
    }

    #[test]
    fn test_allowed_types() {
        assert!(is_image_type_allowed("image/jpeg"));
        assert!(is_image_type_allowed("image/JPG"));
        assert!(is_image_type_allowed("image/webp; charset=binary"));
        assert!(!is_image_type_allowed("application/pdf"));
        assert!(!is_image_type_allowed("image/svg+xml"));
    }

    #[test]
    fn test_check_rejects_bad_parts() {
        assert!(part("image/png", 10).check().is_ok());
        assert!(part("image/png", 0).check().is_err());
        assert!(part("image/png", MAX_IMAGE_SIZE + 1).check().is_err());
        assert!(part("text/plain", 10).check().is_err());
    }
}
