use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::models::{ApprovalStatus, AttendanceRecord, Coordinates, OfficeLocation, OfficeLocationSnapshot};

// Database row types that match the Postgres schema in migrations/
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AttendanceRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_latitude: Option<f64>,
    pub check_in_longitude: Option<f64>,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    pub check_in_distance_meters: Option<f64>,
    pub allowed_radius_meters: Option<f64>,
    pub is_remote: bool,
    pub approval_status: ApprovalStatus,
    pub resolved_by: Option<Uuid>,
    pub resolution_notes: Option<String>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OfficeLocationRow {
    pub latitude: f64,
    pub longitude: f64,
    pub allowed_radius_meters: f64,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTime<Utc>,
}

fn coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Option<Coordinates> {
    match (latitude, longitude) {
        (Some(lat), Some(lon)) => match Coordinates::new(lat, lon) {
            Ok(point) => Some(point),
            Err(e) => {
                log::warn!("Dropping stored location ({}, {}): {}", lat, lon, e);
                None
            }
        },
        _ => None,
    }
}

// Conversion functions
impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            work_date: row.work_date,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            check_in_location: coordinates(row.check_in_latitude, row.check_in_longitude),
            check_out_location: coordinates(row.check_out_latitude, row.check_out_longitude),
            check_in_distance_meters: row.check_in_distance_meters,
            allowed_radius_meters: row.allowed_radius_meters,
            is_remote: row.is_remote,
            approval_status: row.approval_status,
            resolved_by: row.resolved_by,
            resolution_notes: row.resolution_notes,
            resolved_at: row.resolved_at,
            notes: row.notes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<OfficeLocationRow> for OfficeLocationSnapshot {
    fn from(row: OfficeLocationRow) -> Self {
        Self {
            location: OfficeLocation {
                latitude: row.latitude,
                longitude: row.longitude,
                allowed_radius_meters: row.allowed_radius_meters,
            },
            updated_by: row.updated_by,
            updated_at: row.updated_at,
        }
    }
}
