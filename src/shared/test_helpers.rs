use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use exif::experimental::Writer;
use exif::{Field, In, Rational, Tag, Value};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

use crate::app::AppServices;
use crate::core::config::ThumbnailConfig;
use crate::core::error::{AppError, Result};
use crate::features::analysis::{AnalysisService, LabelDetector};
use crate::features::notifications::{MemoryMailOutbox, NotificationService};
use crate::features::sightings::{MemorySightingStore, SightingService};
use crate::features::uploads::UploadService;
use crate::modules::storage::MemoryObjectStorage;

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn gradient(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Png)
}

pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    encode(&gradient(width, height), ImageFormat::Jpeg)
}

/// Degrees as degree/minute/second rationals
fn dms(value: f64) -> Vec<Rational> {
    let value = value.abs();
    let degrees = value.trunc();
    let minutes = ((value - degrees) * 60.0).trunc();
    let seconds = ((value - degrees) * 60.0 - minutes) * 60.0;
    vec![
        Rational {
            num: degrees as u32,
            denom: 1,
        },
        Rational {
            num: minutes as u32,
            denom: 1,
        },
        Rational {
            num: (seconds * 10_000.0).round() as u32,
            denom: 10_000,
        },
    ]
}

/// A small JPEG carrying GPS coordinates in its EXIF block
pub fn jpeg_with_gps(latitude: f64, longitude: f64) -> Vec<u8> {
    let ascii = |s: &str| Value::Ascii(vec![s.as_bytes().to_vec()]);
    let fields = vec![
        Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: ascii("GaiGi Test"),
        },
        Field {
            tag: Tag::GPSLatitudeRef,
            ifd_num: In::PRIMARY,
            value: ascii(if latitude < 0.0 { "S" } else { "N" }),
        },
        Field {
            tag: Tag::GPSLatitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(dms(latitude)),
        },
        Field {
            tag: Tag::GPSLongitudeRef,
            ifd_num: In::PRIMARY,
            value: ascii(if longitude < 0.0 { "W" } else { "E" }),
        },
        Field {
            tag: Tag::GPSLongitude,
            ifd_num: In::PRIMARY,
            value: Value::Rational(dms(longitude)),
        },
    ];

    let mut writer = Writer::new();
    for field in &fields {
        writer.push_field(field);
    }
    let mut tiff = Cursor::new(Vec::new());
    writer.write(&mut tiff, false).unwrap();
    let tiff = tiff.into_inner();

    // SOI, then APP1 "Exif\0\0" + TIFF, then the rest of the JPEG
    let jpeg = jpeg_bytes(64, 48);
    let segment_len = (2 + 6 + tiff.len()) as u16;
    let mut out = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    out.extend_from_slice(&jpeg[..2]);
    out.extend_from_slice(&[0xFF, 0xE1]);
    out.extend_from_slice(&segment_len.to_be_bytes());
    out.extend_from_slice(b"Exif\0\0");
    out.extend_from_slice(&tiff);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// One part of a multipart test form
pub struct FormPart {
    name: String,
    file: Option<(String, String)>,
    data: Vec<u8>,
}

impl FormPart {
    pub fn file(name: &str, file_name: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            file: Some((file_name.to_string(), content_type.to_string())),
            data,
        }
    }

    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file: None,
            data: value.as_bytes().to_vec(),
        }
    }
}

const BOUNDARY: &str = "gaigi-test-boundary";

pub fn multipart_request(uri: &str, parts: &[FormPart]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match &part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    part.name, file_name, content_type
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Detector that always returns the same labels
pub struct StaticDetector(pub Vec<String>);

#[async_trait]
impl LabelDetector for StaticDetector {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }
}

/// Detector whose upstream is down
pub struct FailingDetector;

#[async_trait]
impl LabelDetector for FailingDetector {
    async fn detect_labels(&self, _image: &[u8]) -> Result<Vec<String>> {
        Err(AppError::ExternalServiceError("vision unavailable".to_string()))
    }
}

pub fn memory_sighting_service() -> Arc<SightingService> {
    let notifications = Arc::new(NotificationService::new(
        None,
        Arc::new(MemoryMailOutbox::new()),
    ));
    Arc::new(SightingService::new(
        Arc::new(MemorySightingStore::new()),
        notifications,
    ))
}

/// In-memory collaborators behind `memory_services`
pub struct TestBackends {
    pub storage: Arc<MemoryObjectStorage>,
    pub outbox: Arc<MemoryMailOutbox>,
}

/// Full service set on in-memory backends; detector reports a dog
pub fn memory_services() -> (AppServices, TestBackends) {
    let storage = Arc::new(MemoryObjectStorage::new("http://files.test"));
    let outbox = Arc::new(MemoryMailOutbox::new());
    let notifications = Arc::new(NotificationService::new(
        Some("alerts@example.com".to_string()),
        outbox.clone(),
    ));

    let services = AppServices {
        sightings: Arc::new(SightingService::new(
            Arc::new(MemorySightingStore::new()),
            notifications,
        )),
        uploads: Arc::new(UploadService::new(
            storage.clone(),
            "sightings".to_string(),
            ThumbnailConfig::default(),
        )),
        analysis: Arc::new(AnalysisService::new(Arc::new(StaticDetector(vec![
            "Dog".to_string(),
            "Pet".to_string(),
        ])))),
    };

    (services, TestBackends { storage, outbox })
}

/// Serve the API on an ephemeral local port and return its base URL
pub async fn spawn_server(services: AppServices) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = crate::app::api_routes(services);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
