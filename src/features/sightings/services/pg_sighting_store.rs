use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::sightings::models::{NewSighting, Sighting, SightingPatch, SightingRow};
use crate::features::sightings::services::SightingStore;

const SIGHTING_COLUMNS: &str = r#"
    id, owner_id, image_url, thumbnail_url, category, category_label,
    latitude, longitude, location_verified, location_source, note,
    created_at, updated_at
"#;

/// Postgres-backed sighting store
pub struct PgSightingStore {
    pool: PgPool,
}

impl PgSightingStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SightingStore for PgSightingStore {
    async fn create(&self, data: NewSighting) -> Result<Sighting> {
        let now = Utc::now();
        let query = format!(
            r#"
            INSERT INTO sightings (
                id, owner_id, image_url, thumbnail_url, category, category_label,
                latitude, longitude, location_verified, location_source, note,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $12)
            RETURNING {}
            "#,
            SIGHTING_COLUMNS
        );

        let row = sqlx::query_as::<_, SightingRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&data.owner_id)
            .bind(&data.image_url)
            .bind(&data.thumbnail_url)
            .bind(data.category.as_str())
            .bind(&data.category_label)
            .bind(data.latitude)
            .bind(data.longitude)
            .bind(data.location_verified)
            .bind(data.location_source.as_str())
            .bind(&data.note)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create sighting: {:?}", e);
                AppError::Database(e)
            })?;

        Sighting::try_from(row)
    }

    async fn list(&self) -> Result<Vec<Sighting>> {
        let query = format!(
            "SELECT {} FROM sightings ORDER BY created_at DESC, id DESC",
            SIGHTING_COLUMNS
        );

        let rows = sqlx::query_as::<_, SightingRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        // A single undecodable row must not hide the rest of the collection
        Ok(rows
            .into_iter()
            .filter_map(|row| match Sighting::try_from(row) {
                Ok(sighting) => Some(sighting),
                Err(e) => {
                    tracing::warn!("Skipping unreadable sighting: {}", e);
                    None
                }
            })
            .collect())
    }

    async fn get(&self, id: Uuid) -> Result<Option<Sighting>> {
        let query = format!("SELECT {} FROM sightings WHERE id = $1", SIGHTING_COLUMNS);

        sqlx::query_as::<_, SightingRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Sighting::try_from)
            .transpose()
    }

    async fn update(&self, id: Uuid, patch: SightingPatch) -> Result<Option<Sighting>> {
        let query = format!(
            r#"
            UPDATE sightings SET
                category = COALESCE($2, category),
                category_label = COALESCE($3, category_label),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                location_verified = COALESCE($6, location_verified),
                location_source = COALESCE($7, location_source),
                note = COALESCE($8, note),
                updated_at = GREATEST(NOW(), created_at)
            WHERE id = $1
            RETURNING {}
            "#,
            SIGHTING_COLUMNS
        );

        let row = sqlx::query_as::<_, SightingRow>(&query)
            .bind(id)
            .bind(patch.category.map(|c| c.as_str()))
            .bind(patch.category_label)
            .bind(patch.latitude)
            .bind(patch.longitude)
            .bind(patch.location_verified)
            .bind(patch.location_source.map(|s| s.as_str()))
            .bind(patch.note)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_some() {
            tracing::info!("Updated sighting: {}", id);
        }

        row.map(Sighting::try_from).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sightings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::info!("Deleted sighting: {}", id);
        }
        Ok(deleted)
    }
}
