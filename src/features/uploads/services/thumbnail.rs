use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::core::config::ThumbnailConfig;
use crate::core::error::AppError;

/// An encoded JPEG thumbnail
#[derive(Debug, Clone)]
pub struct Thumbnail {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Largest size with the same aspect ratio that fits the box; never upscales
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height);
    (w, h)
}

/// Decode `data`, fit it into the configured box and re-encode as JPEG
pub fn make_thumbnail(data: &[u8], config: &ThumbnailConfig) -> Result<Thumbnail, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::BadRequest(format!("Unsupported or corrupt image: {}", e)))?;

    let (width, height) = fit_within(
        img.width(),
        img.height(),
        config.max_width,
        config.max_height,
    );
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let rgb = resized.to_rgb8();

    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality);
    encoder
        .encode_image(&rgb)
        .map_err(|e| AppError::Internal(format!("Failed to encode thumbnail: {}", e)))?;

    Ok(Thumbnail {
        data: buffer.into_inner(),
        width,
        height,
    })
}
