use std::path::Path;

use image::ImageFormat;

/// A photo picked by the user, kept in memory for the whole submission
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl Photo {
    /// Content type is sniffed from the bytes, then from the file name
    pub fn new(file_name: impl Into<String>, data: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = image::guess_format(&data)
            .or_else(|_| ImageFormat::from_path(&file_name))
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| "application/octet-stream".to_string());

        Self {
            file_name,
            content_type,
            data,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("photo")
            .to_string();
        Ok(Self::new(file_name, data))
    }
}
