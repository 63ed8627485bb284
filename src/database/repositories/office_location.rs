use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{OfficeLocation, OfficeLocationSnapshot};
use crate::database::store::OfficeLocationStore;
use crate::database::types::OfficeLocationRow;
use crate::error::AttendanceResult;

/// Single-row table keyed by `id = 1`.
#[derive(Clone)]
pub struct OfficeLocationRepository {
    pool: PgPool,
}

impl OfficeLocationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfficeLocationStore for OfficeLocationRepository {
    async fn load(&self) -> AttendanceResult<Option<OfficeLocationSnapshot>> {
        let row = sqlx::query_as::<_, OfficeLocationRow>(
            r#"
            SELECT
                latitude,
                longitude,
                allowed_radius_meters,
                updated_by,
                updated_at
            FROM
                office_location
            WHERE
                id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn save(
        &self,
        location: &OfficeLocation,
        updated_by: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AttendanceResult<OfficeLocationSnapshot> {
        let row = sqlx::query_as::<_, OfficeLocationRow>(
            r#"
            INSERT INTO
                office_location (id, latitude, longitude, allowed_radius_meters, updated_by, updated_at)
            VALUES
                (1, $1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET
                latitude = EXCLUDED.latitude,
                longitude = EXCLUDED.longitude,
                allowed_radius_meters = EXCLUDED.allowed_radius_meters,
                updated_by = EXCLUDED.updated_by,
                updated_at = EXCLUDED.updated_at
            RETURNING
                latitude,
                longitude,
                allowed_radius_meters,
                updated_by,
                updated_at
            "#,
        )
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.allowed_radius_meters)
        .bind(updated_by)
        .bind(updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
