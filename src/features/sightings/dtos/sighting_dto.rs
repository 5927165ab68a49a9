use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::sightings::models::{Category, LocationSource, Sighting};

/// Request DTO for creating a sighting
///
/// Field names of the first client revision (`userId`, `thingType`,
/// `thingDescription`, `textDescription`) are accepted as aliases.
/// Required fields are optional here so a missing one yields a 400 with a
/// readable message instead of a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSightingDto {
    #[serde(default, alias = "userId")]
    #[validate(length(max = 128, message = "ownerId must not exceed 128 characters"))]
    pub owner_id: Option<String>,

    /// URL of the stored full-size image (required)
    #[serde(default)]
    #[validate(length(max = 2048, message = "imageUrl must not exceed 2048 characters"))]
    pub image_url: Option<String>,

    /// URL of the stored thumbnail; defaults to `imageUrl`
    #[serde(default)]
    #[validate(length(max = 2048, message = "thumbnailUrl must not exceed 2048 characters"))]
    pub thumbnail_url: Option<String>,

    /// Category tag (required)
    #[serde(default, alias = "thingType")]
    #[schema(example = "objects")]
    pub category: Option<String>,

    /// Free-text synopsis; defaults to `"Auto-detected: <category>"`
    #[serde(default, alias = "thingDescription")]
    #[validate(length(max = 255, message = "categoryLabel must not exceed 255 characters"))]
    pub category_label: Option<String>,

    /// Latitude in decimal degrees (required); numeric strings are accepted
    #[serde(default, deserialize_with = "lenient_f64")]
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be within [-90, 90]"))]
    pub latitude: Option<f64>,

    /// Longitude in decimal degrees (required); numeric strings are accepted
    #[serde(default, deserialize_with = "lenient_f64")]
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be within [-180, 180]"))]
    pub longitude: Option<f64>,

    /// Ignored when `locationSource` is present
    #[serde(default)]
    pub location_verified: Option<bool>,

    #[serde(default)]
    pub location_source: Option<LocationSource>,

    #[serde(default, alias = "textDescription")]
    #[validate(length(max = 5000, message = "note must not exceed 5000 characters"))]
    pub note: Option<String>,
}

/// Accept `35.0`, `"35.0"`, `null` or an empty string
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("'{}' is not a number", s))),
    }
}

/// Response DTO for one sighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SightingDto {
    pub id: Uuid,
    pub owner_id: Option<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: Category,
    pub category_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_verified: bool,
    #[serde(default)]
    pub location_source: LocationSource,
    #[serde(default)]
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_anonymous: bool,
}

impl From<Sighting> for SightingDto {
    fn from(s: Sighting) -> Self {
        Self {
            is_anonymous: s.is_anonymous(),
            id: s.id,
            owner_id: s.owner_id,
            image_url: s.image_url,
            thumbnail_url: s.thumbnail_url,
            category: s.category,
            category_label: s.category_label,
            latitude: s.latitude,
            longitude: s.longitude,
            location_verified: s.location_verified,
            location_source: s.location_source,
            note: s.note,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

/// Response DTO for `GET /sightings`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SightingListResponseDto {
    pub sightings: Vec<SightingDto>,
}

/// Response DTO for `GET /sightings/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SightingDetailResponseDto {
    pub sighting: SightingDto,
}

/// Response DTO for `POST /sightings`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateSightingResponseDto {
    pub id: Uuid,
    pub success: bool,
}
