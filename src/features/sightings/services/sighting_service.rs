use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::notifications::NotificationService;
use crate::features::sightings::dtos::CreateSightingDto;
use crate::features::sightings::models::{
    Category, LocationSource, NewSighting, Sighting, SightingPatch,
};
use crate::features::sightings::services::SightingStore;
use crate::shared::validation::{is_valid_latitude, is_valid_longitude};

/// Service for sighting operations
pub struct SightingService {
    store: Arc<dyn SightingStore>,
    notifications: Arc<NotificationService>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SightingService {
    pub fn new(store: Arc<dyn SightingStore>, notifications: Arc<NotificationService>) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Turn a request body into a record to insert.
    ///
    /// `imageUrl`, `category`, `latitude` and `longitude` are required.
    pub fn prepare(dto: CreateSightingDto) -> Result<NewSighting> {
        let image_url = non_empty(dto.image_url);
        let category = non_empty(dto.category);
        let (Some(image_url), Some(category), Some(latitude), Some(longitude)) =
            (image_url, category, dto.latitude, dto.longitude)
        else {
            return Err(AppError::Validation("Missing required fields".to_string()));
        };

        let category = category
            .parse::<Category>()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if !is_valid_latitude(latitude) || !is_valid_longitude(longitude) {
            return Err(AppError::Validation(
                "Coordinates are out of range".to_string(),
            ));
        }

        // Provenance decides verification when the client reports it
        let (location_source, location_verified) = match dto.location_source {
            Some(source) => (source, source.is_verified()),
            None => (
                LocationSource::Unset,
                dto.location_verified.unwrap_or(false),
            ),
        };

        Ok(NewSighting {
            owner_id: non_empty(dto.owner_id),
            thumbnail_url: non_empty(dto.thumbnail_url).unwrap_or_else(|| image_url.clone()),
            image_url,
            category_label: non_empty(dto.category_label)
                .unwrap_or_else(|| category.auto_label()),
            category,
            latitude,
            longitude,
            location_verified,
            location_source,
            note: dto.note.unwrap_or_default(),
        })
    }

    pub async fn create(&self, dto: CreateSightingDto) -> Result<Sighting> {
        let data = Self::prepare(dto)?;
        let sighting = self.store.create(data).await?;

        tracing::info!(
            "Created sighting: {} (category: {}, anonymous: {})",
            sighting.id,
            sighting.category,
            sighting.is_anonymous()
        );

        self.notifications.sighting_created(&sighting).await;
        Ok(sighting)
    }

    /// All sightings, newest first
    pub async fn list(&self) -> Result<Vec<Sighting>> {
        self.store.list().await
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Sighting> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Sighting not found".to_string()))
    }

    pub async fn update(&self, id: Uuid, patch: SightingPatch) -> Result<Sighting> {
        if patch.latitude.is_some_and(|lat| !is_valid_latitude(lat))
            || patch.longitude.is_some_and(|lng| !is_valid_longitude(lng))
        {
            return Err(AppError::Validation(
                "Coordinates are out of range".to_string(),
            ));
        }

        self.store
            .update(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Sighting not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.store.delete(id).await? {
            Ok(())
        } else {
            Err(AppError::NotFound("Sighting not found".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::notifications::MemoryMailOutbox;
    use crate::features::sightings::services::MemorySightingStore;
    use tokio_test::{assert_err, assert_ok};

    fn service() -> (SightingService, Arc<MemoryMailOutbox>) {
        let outbox = Arc::new(MemoryMailOutbox::new());
        let notifications = Arc::new(NotificationService::new(
            Some("ops@example.com".to_string()),
            outbox.clone(),
        ));
        (
            SightingService::new(Arc::new(MemorySightingStore::new()), notifications),
            outbox,
        )
    }

    fn valid_dto() -> CreateSightingDto {
        CreateSightingDto {
            image_url: Some("https://img/full.jpg".to_string()),
            category: Some("objects".to_string()),
            latitude: Some(35.0),
            longitude: Some(139.0),
            location_source: Some(LocationSource::FromPhoto),
            ..Default::default()
        }
    }

    #[test]
    fn test_prepare_fills_defaults() {
        let data = SightingService::prepare(valid_dto()).unwrap();

        assert_eq!(data.thumbnail_url, "https://img/full.jpg");
        assert_eq!(data.category_label, "Auto-detected: objects");
        assert_eq!(data.owner_id, None);
        assert!(data.location_verified);
        assert_eq!(data.note, "");
    }

    #[test]
    fn test_prepare_rejects_missing_fields() {
        for dto in [
            CreateSightingDto {
                image_url: None,
                ..valid_dto()
            },
            CreateSightingDto {
                category: Some("  ".to_string()),
                ..valid_dto()
            },
            CreateSightingDto {
                latitude: None,
                ..valid_dto()
            },
            CreateSightingDto {
                longitude: None,
                ..valid_dto()
            },
        ] {
            let err = SightingService::prepare(dto).unwrap_err();
            assert!(matches!(err, AppError::Validation(ref m) if m == "Missing required fields"));
        }
    }

    #[test]
    fn test_prepare_accepts_zero_coordinates() {
        let data = SightingService::prepare(CreateSightingDto {
            latitude: Some(0.0),
            longitude: Some(0.0),
            ..valid_dto()
        })
        .unwrap();
        assert_eq!((data.latitude, data.longitude), (0.0, 0.0));
    }

    #[test]
    fn test_manual_source_is_not_verified() {
        let data = SightingService::prepare(CreateSightingDto {
            location_source: Some(LocationSource::Manual),
            location_verified: Some(true),
            ..valid_dto()
        })
        .unwrap();
        assert!(!data.location_verified);
    }

    #[test]
    fn test_prepare_rejects_unknown_category() {
        let err = SightingService::prepare(CreateSightingDto {
            category: Some("ufo".to_string()),
            ..valid_dto()
        })
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_notifies_and_get_round_trips() {
        let (service, outbox) = service();
        let created = service.create(valid_dto()).await.unwrap();

        assert_eq!(service.get_by_id(created.id).await.unwrap(), created);
        assert_eq!(outbox.queued().await.len(), 1);
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let (service, _) = service();
        let err = assert_err!(service.get_by_id(Uuid::now_v7()).await);
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_validates_and_delete_reports_missing() {
        let (service, _) = service();
        let created = assert_ok!(service.create(valid_dto()).await);

        let err = assert_err!(
            service
                .update(
                    created.id,
                    SightingPatch {
                        latitude: Some(120.0),
                        ..Default::default()
                    },
                )
                .await
        );
        assert!(matches!(err, AppError::Validation(_)));

        assert_ok!(service.delete(created.id).await);
        assert!(matches!(
            assert_err!(service.delete(created.id).await),
            AppError::NotFound(_)
        ));
    }
}
