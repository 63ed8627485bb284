use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{ApprovalStatus, AttendanceRecord, Coordinates};
use crate::database::store::AttendanceStore;
use crate::database::types::AttendanceRow;
use crate::error::{AttendanceError, AttendanceResult};

const RECORD_COLUMNS: &str = r#"
    id,
    user_id,
    work_date,
    check_in_time,
    check_out_time,
    check_in_latitude,
    check_in_longitude,
    check_out_latitude,
    check_out_longitude,
    check_in_distance_meters,
    allowed_radius_meters,
    is_remote,
    approval_status,
    resolved_by,
    resolution_notes,
    resolved_at,
    notes,
    created_at,
    updated_at
"#;

#[derive(Clone)]
pub struct AttendanceRepository {
    pool: PgPool,
}

impl AttendanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendanceRepository {
    async fn insert_checked_in(
        &self,
        record: AttendanceRecord,
    ) -> AttendanceResult<AttendanceRecord> {
        // Both the (user_id, work_date) unique index and the partial index on
        // open sessions reject a second concurrent insert.
        let query = format!(
            r#"
            INSERT INTO
                attendance_records (
                    id,
                    user_id,
                    work_date,
                    check_in_time,
                    check_in_latitude,
                    check_in_longitude,
                    check_in_distance_meters,
                    allowed_radius_meters,
                    is_remote,
                    approval_status,
                    notes,
                    created_at,
                    updated_at
                )
            VALUES
                ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let result = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(record.id)
            .bind(record.user_id)
            .bind(record.work_date)
            .bind(record.check_in_time)
            .bind(record.check_in_location.map(|c| c.latitude()))
            .bind(record.check_in_location.map(|c| c.longitude()))
            .bind(record.check_in_distance_meters)
            .bind(record.allowed_radius_meters)
            .bind(record.is_remote)
            .bind(record.approval_status)
            .bind(&record.notes)
            .bind(record.created_at)
            .bind(record.updated_at)
            .fetch_one(&self.pool)
            .await;

        match result {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Err(AttendanceError::AlreadyCheckedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> AttendanceResult<Option<AttendanceRecord>> {
        let query = format!(
            "SELECT {} FROM attendance_records WHERE id = $1",
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_open_for_user(
        &self,
        user_id: Uuid,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let query = format!(
            r#"
            SELECT {}
            FROM attendance_records
            WHERE user_id = $1
              AND check_in_time IS NOT NULL
              AND check_out_time IS NULL
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_for_user_on(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let query = format!(
            "SELECT {} FROM attendance_records WHERE user_id = $1 AND work_date = $2",
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .bind(work_date)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn close_open(
        &self,
        id: Uuid,
        check_out_time: DateTime<Utc>,
        location: Option<Coordinates>,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let query = format!(
            r#"
            UPDATE attendance_records
            SET
                check_out_time = $1,
                check_out_latitude = $2,
                check_out_longitude = $3,
                updated_at = $1
            WHERE
                id = $4
                AND check_out_time IS NULL
                AND check_in_time < $1
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(check_out_time)
            .bind(location.map(|c| c.latitude()))
            .bind(location.map(|c| c.longitude()))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn resolve_pending(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        resolved_by: Uuid,
        notes: Option<String>,
        resolved_at: DateTime<Utc>,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let query = format!(
            r#"
            UPDATE attendance_records
            SET
                approval_status = $1,
                resolved_by = $2,
                resolution_notes = $3,
                resolved_at = $4,
                updated_at = $4
            WHERE
                id = $5
                AND approval_status = 'pending'
            RETURNING {}
            "#,
            RECORD_COLUMNS
        );

        let row = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(status)
            .bind(resolved_by)
            .bind(notes)
            .bind(resolved_at)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_pending_for_users(
        &self,
        user_ids: &HashSet<Uuid>,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!(
            r#"
            SELECT {}
            FROM attendance_records
            WHERE approval_status = 'pending'
              AND user_id = ANY($1)
            ORDER BY check_in_time ASC
            "#,
            RECORD_COLUMNS
        );

        let ids: Vec<Uuid> = user_ids.iter().copied().collect();
        let rows = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        let query = format!(
            r#"
            SELECT {}
            FROM attendance_records
            WHERE user_id = $1
              AND work_date BETWEEN $2 AND $3
            ORDER BY work_date ASC
            "#,
            RECORD_COLUMNS
        );

        let rows = sqlx::query_as::<_, AttendanceRow>(&query)
            .bind(user_id)
            .bind(from)
            .bind(to)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
