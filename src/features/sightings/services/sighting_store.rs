use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::sightings::models::{NewSighting, Sighting, SightingPatch};

/// Persistence for sighting records.
///
/// The store assigns `id`, `created_at` and `updated_at`; on creation both
/// timestamps are equal. `list` returns records newest first.
#[async_trait]
pub trait SightingStore: Send + Sync {
    async fn create(&self, data: NewSighting) -> Result<Sighting>;

    async fn list(&self) -> Result<Vec<Sighting>>;

    async fn get(&self, id: Uuid) -> Result<Option<Sighting>>;

    /// Returns `None` if no record has this id
    async fn update(&self, id: Uuid, patch: SightingPatch) -> Result<Option<Sighting>>;

    /// Returns whether a record was removed
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
