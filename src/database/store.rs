//! Persistence and organisational collaborators the attendance core talks to.
//!
//! Every method is a single round-trip with its own atomicity guarantee; the
//! services never hold a transaction across calls.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    ApprovalStatus, AttendanceRecord, Coordinates, OfficeLocation, OfficeLocationSnapshot,
};
use crate::error::AttendanceResult;

#[async_trait]
pub trait AttendanceStore: Send + Sync + 'static {
    /// Inserts a freshly checked-in record. The "no open session and no record
    /// for this work date" check and the insert form one atomic unit; losing
    /// the race yields `AlreadyCheckedIn`.
    async fn insert_checked_in(&self, record: AttendanceRecord)
    -> AttendanceResult<AttendanceRecord>;

    async fn find_by_id(&self, id: Uuid) -> AttendanceResult<Option<AttendanceRecord>>;

    async fn find_open_for_user(&self, user_id: Uuid)
    -> AttendanceResult<Option<AttendanceRecord>>;

    async fn find_for_user_on(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>>;

    /// Sets the check-out only if the record is still open. `None` means the
    /// record was missing or already closed when the write ran.
    async fn close_open(
        &self,
        id: Uuid,
        check_out_time: DateTime<Utc>,
        location: Option<Coordinates>,
    ) -> AttendanceResult<Option<AttendanceRecord>>;

    /// Moves a pending record to a terminal status. `None` means it was no
    /// longer pending when the write ran, so the first resolution always wins.
    async fn resolve_pending(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        resolved_by: Uuid,
        notes: Option<String>,
        resolved_at: DateTime<Utc>,
    ) -> AttendanceResult<Option<AttendanceRecord>>;

    /// Pending remote check-ins of the given workers, oldest first.
    async fn list_pending_for_users(
        &self,
        user_ids: &HashSet<Uuid>,
    ) -> AttendanceResult<Vec<AttendanceRecord>>;

    /// A worker's records with `work_date` in `[from, to]`, oldest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>>;
}

#[async_trait]
pub trait OfficeLocationStore: Send + Sync + 'static {
    async fn load(&self) -> AttendanceResult<Option<OfficeLocationSnapshot>>;

    /// Replaces the stored configuration; the last committed write wins.
    async fn save(
        &self,
        location: &OfficeLocation,
        updated_by: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AttendanceResult<OfficeLocationSnapshot>;
}

/// Organisational hierarchy: which workers a manager is responsible for.
#[async_trait]
pub trait TeamDirectory: Send + Sync + 'static {
    async fn workers_managed_by(&self, manager_id: Uuid) -> AttendanceResult<HashSet<Uuid>>;
}
