use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use exif::{Exif, In, Tag, Value};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::client::error::LocationError;
use crate::features::sightings::models::LocationSource;
use crate::shared::validation::{is_valid_latitude, is_valid_longitude};

/// A point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_latitude(self.latitude) && is_valid_longitude(self.longitude)
    }
}

/// The device's live location sensor
#[async_trait]
pub trait DeviceLocator: Send + Sync {
    /// One read; may prompt the user for permission
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// A device without a usable location sensor
pub struct NoDeviceLocation;

#[async_trait]
impl DeviceLocator for NoDeviceLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Err(LocationError::Unavailable(
            "no location sensor".to_string(),
        ))
    }
}

/// A device that reports a fixed position
pub struct FixedDeviceLocation(pub Coordinates);

#[async_trait]
impl DeviceLocator for FixedDeviceLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        Ok(self.0)
    }
}

/// Best-guess location for a photo and where it came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedLocation {
    pub coordinates: Option<Coordinates>,
    pub source: LocationSource,
}

impl ResolvedLocation {
    pub fn unset() -> Self {
        Self {
            coordinates: None,
            source: LocationSource::Unset,
        }
    }
}

fn degrees(exif: &Exif, tag: Tag) -> Option<f64> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Rational(parts) if !parts.is_empty() => {
            let mut total = 0.0;
            for (part, scale) in parts.iter().zip([1.0, 60.0, 3600.0]) {
                if part.denom == 0 {
                    return None;
                }
                total += part.to_f64() / scale;
            }
            Some(total)
        }
        _ => None,
    }
}

fn hemisphere(exif: &Exif, tag: Tag) -> Option<u8> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(values) => values
            .first()
            .and_then(|v| v.first())
            .map(|c| c.to_ascii_uppercase()),
        _ => None,
    }
}

/// GPS coordinates embedded in the photo's EXIF block, if any
///
/// Unreadable or partial metadata counts as "no GPS".
pub fn exif_coordinates(image: &[u8]) -> Option<Coordinates> {
    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(image)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No readable EXIF metadata: {}", e);
            return None;
        }
    };

    let mut latitude = degrees(&exif, Tag::GPSLatitude)?;
    let mut longitude = degrees(&exif, Tag::GPSLongitude)?;
    if hemisphere(&exif, Tag::GPSLatitudeRef) == Some(b'S') {
        latitude = -latitude;
    }
    if hemisphere(&exif, Tag::GPSLongitudeRef) == Some(b'W') {
        longitude = -longitude;
    }

    let coordinates = Coordinates::new(latitude, longitude);
    coordinates.is_valid().then_some(coordinates)
}

/// Photo metadata first, then one device read, else unset
pub struct GeolocationResolver {
    device: Arc<dyn DeviceLocator>,
    device_timeout: Duration,
}

impl GeolocationResolver {
    pub fn new(device: Arc<dyn DeviceLocator>, device_timeout: Duration) -> Self {
        Self {
            device,
            device_timeout,
        }
    }

    pub async fn resolve(&self, image: &[u8]) -> ResolvedLocation {
        if let Some(coordinates) = exif_coordinates(image) {
            debug!("Location from photo metadata: {:?}", coordinates);
            return ResolvedLocation {
                coordinates: Some(coordinates),
                source: LocationSource::FromPhoto,
            };
        }

        match tokio::time::timeout(self.device_timeout, self.device.current_position()).await {
            Ok(Ok(coordinates)) if coordinates.is_valid() => ResolvedLocation {
                coordinates: Some(coordinates),
                source: LocationSource::FromDevice,
            },
            Ok(Ok(coordinates)) => {
                warn!("Device reported invalid coordinates: {:?}", coordinates);
                ResolvedLocation::unset()
            }
            Ok(Err(e)) => {
                warn!("Device location failed: {}", e);
                ResolvedLocation::unset()
            }
            Err(_) => {
                warn!("{}", LocationError::Timeout);
                ResolvedLocation::unset()
            }
        }
    }
}
