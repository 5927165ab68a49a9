use async_trait::async_trait;
use chrono::Utc;
use std::cmp::Reverse;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::sightings::models::{NewSighting, Sighting, SightingPatch};
use crate::features::sightings::services::SightingStore;

/// Process-local sighting store for development and tests
#[derive(Default)]
pub struct MemorySightingStore {
    /// Records with their insertion sequence, used to break timestamp ties
    records: RwLock<Vec<(u64, Sighting)>>,
}

impl MemorySightingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SightingStore for MemorySightingStore {
    async fn create(&self, data: NewSighting) -> Result<Sighting> {
        let now = Utc::now();
        let sighting = Sighting {
            id: Uuid::now_v7(),
            owner_id: data.owner_id,
            image_url: data.image_url,
            thumbnail_url: data.thumbnail_url,
            category: data.category,
            category_label: data.category_label,
            latitude: data.latitude,
            longitude: data.longitude,
            location_verified: data.location_verified,
            location_source: data.location_source,
            note: data.note,
            created_at: now,
            updated_at: now,
        };

        let mut records = self.records.write().await;
        let seq = records.last().map(|(seq, _)| seq + 1).unwrap_or(0);
        records.push((seq, sighting.clone()));
        Ok(sighting)
    }

    async fn list(&self) -> Result<Vec<Sighting>> {
        let mut records = self.records.read().await.clone();
        records.sort_by_key(|(seq, s)| Reverse((s.created_at, *seq)));
        Ok(records.into_iter().map(|(_, s)| s).collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Sighting>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|(_, s)| s.id == id).map(|(_, s)| s.clone()))
    }

    async fn update(&self, id: Uuid, patch: SightingPatch) -> Result<Option<Sighting>> {
        let mut records = self.records.write().await;
        let Some((_, sighting)) = records.iter_mut().find(|(_, s)| s.id == id) else {
            return Ok(None);
        };
        patch.apply(sighting, Utc::now());
        Ok(Some(sighting.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|(_, s)| s.id != id);
        Ok(records.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::sightings::models::{Category, LocationSource};
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;

    fn new_sighting(category: Category) -> NewSighting {
        NewSighting {
            owner_id: None,
            image_url: "https://img/full.jpg".to_string(),
            thumbnail_url: "https://img/thumb.jpg".to_string(),
            category,
            category_label: category.auto_label(),
            latitude: 35.0,
            longitude: 139.0,
            location_verified: true,
            location_source: LocationSource::FromPhoto,
            note: Sentence(3..8).fake(),
        }
    }

    #[tokio::test]
    async fn test_create_sets_equal_timestamps() {
        let store = MemorySightingStore::new();
        let created = store.create(new_sighting(Category::Objects)).await.unwrap();

        assert_eq!(created.created_at, created.updated_at);
        assert_eq!(store.get(created.id).await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let store = MemorySightingStore::new();
        let first = store.create(new_sighting(Category::People)).await.unwrap();
        let second = store.create(new_sighting(Category::Bags)).await.unwrap();

        let ids: Vec<Uuid> = store.list().await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let store = MemorySightingStore::new();
        let created = store.create(new_sighting(Category::Trash)).await.unwrap();

        let updated = store
            .update(
                created.id,
                SightingPatch {
                    category: Some(Category::Bags),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.category, Category::Bags);
        assert!(updated.updated_at >= updated.created_at);

        assert!(store.delete(created.id).await.unwrap());
        assert!(!store.delete(created.id).await.unwrap());
        assert_eq!(store.get(created.id).await.unwrap(), None);
        assert_eq!(
            store
                .update(created.id, SightingPatch::default())
                .await
                .unwrap(),
            None
        );
    }
}
