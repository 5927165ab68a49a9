use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::sightings::models::{Category, LocationSource};

/// A report of one suspicious thing
#[derive(Debug, Clone, PartialEq)]
pub struct Sighting {
    pub id: Uuid,
    /// `None` means the report was filed anonymously
    pub owner_id: Option<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: Category,
    pub category_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_verified: bool,
    pub location_source: LocationSource,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sighting {
    pub fn is_anonymous(&self) -> bool {
        self.owner_id.is_none()
    }
}

/// Raw `sightings` row; tags are plain text so old revisions still decode
#[derive(Debug, Clone, FromRow)]
pub struct SightingRow {
    pub id: Uuid,
    pub owner_id: Option<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: String,
    pub category_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_verified: bool,
    pub location_source: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<SightingRow> for Sighting {
    type Error = AppError;

    fn try_from(row: SightingRow) -> Result<Self, Self::Error> {
        let category = row.category.parse::<Category>().map_err(|e| {
            AppError::Internal(format!("Sighting {} has {}", row.id, e))
        })?;
        // Rows written before provenance was tracked have no usable tag
        let location_source = row.location_source.parse().unwrap_or_default();

        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            image_url: row.image_url,
            thumbnail_url: row.thumbnail_url,
            category,
            category_label: row.category_label,
            latitude: row.latitude,
            longitude: row.longitude,
            location_verified: row.location_verified,
            location_source,
            note: row.note,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Data for creating a new sighting; id and timestamps come from the store
#[derive(Debug, Clone, PartialEq)]
pub struct NewSighting {
    pub owner_id: Option<String>,
    pub image_url: String,
    pub thumbnail_url: String,
    pub category: Category,
    pub category_label: String,
    pub latitude: f64,
    pub longitude: f64,
    pub location_verified: bool,
    pub location_source: LocationSource,
    pub note: String,
}

/// Partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SightingPatch {
    pub category: Option<Category>,
    pub category_label: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_verified: Option<bool>,
    pub location_source: Option<LocationSource>,
    pub note: Option<String>,
}

impl SightingPatch {
    pub fn apply(self, sighting: &mut Sighting, now: DateTime<Utc>) {
        if let Some(category) = self.category {
            sighting.category = category;
        }
        if let Some(label) = self.category_label {
            sighting.category_label = label;
        }
        if let Some(latitude) = self.latitude {
            sighting.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            sighting.longitude = longitude;
        }
        if let Some(verified) = self.location_verified {
            sighting.location_verified = verified;
        }
        if let Some(source) = self.location_source {
            sighting.location_source = source;
        }
        if let Some(note) = self.note {
            sighting.note = note;
        }
        sighting.updated_at = now.max(sighting.created_at);
    }
}
