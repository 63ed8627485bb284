//! Process-local stores. Each store keeps its whole state behind one mutex, so
//! every trait method runs as a single critical section and gets the same
//! atomicity the Postgres indexes and conditional updates provide.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::database::models::{
    ApprovalStatus, AttendanceRecord, Coordinates, OfficeLocation, OfficeLocationSnapshot,
};
use crate::database::store::{AttendanceStore, OfficeLocationStore, TeamDirectory};
use crate::error::{AttendanceError, AttendanceResult};

#[derive(Default)]
pub struct InMemoryAttendanceStore {
    records: Mutex<HashMap<Uuid, AttendanceRecord>>,
}

impl InMemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

#[async_trait]
impl AttendanceStore for InMemoryAttendanceStore {
    async fn insert_checked_in(
        &self,
        record: AttendanceRecord,
    ) -> AttendanceResult<AttendanceRecord> {
        let mut records = self.records.lock();

        let conflict = records.values().any(|existing| {
            existing.user_id == record.user_id
                && (existing.is_open() || existing.work_date == record.work_date)
        });
        if conflict {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> AttendanceResult<Option<AttendanceRecord>> {
        Ok(self.records.lock().get(&id).cloned())
    }

    async fn find_open_for_user(
        &self,
        user_id: Uuid,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .find(|r| r.user_id == user_id && r.is_open())
            .cloned())
    }

    async fn find_for_user_on(
        &self,
        user_id: Uuid,
        work_date: NaiveDate,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        Ok(self
            .records
            .lock()
            .values()
            .find(|r| r.user_id == user_id && r.work_date == work_date)
            .cloned())
    }

    async fn close_open(
        &self,
        id: Uuid,
        check_out_time: DateTime<Utc>,
        location: Option<Coordinates>,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let mut records = self.records.lock();

        let Some(record) = records.get_mut(&id) else {
            return Ok(None);
        };
        let closable = record.is_open()
            && record
                .check_in_time
                .is_some_and(|check_in| check_in < check_out_time);
        if !closable {
            return Ok(None);
        }

        record.check_out_time = Some(check_out_time);
        record.check_out_location = location;
        record.updated_at = check_out_time;
        Ok(Some(record.clone()))
    }

    async fn resolve_pending(
        &self,
        id: Uuid,
        status: ApprovalStatus,
        resolved_by: Uuid,
        notes: Option<String>,
        resolved_at: DateTime<Utc>,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        let mut records = self.records.lock();

        match records.get_mut(&id) {
            Some(record) if record.is_pending_approval() => {
                record.approval_status = status;
                record.resolved_by = Some(resolved_by);
                record.resolution_notes = notes;
                record.resolved_at = Some(resolved_at);
                record.updated_at = resolved_at;
                Ok(Some(record.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn list_pending_for_users(
        &self,
        user_ids: &HashSet<Uuid>,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        let mut pending: Vec<AttendanceRecord> = self
            .records
            .lock()
            .values()
            .filter(|r| r.is_pending_approval() && user_ids.contains(&r.user_id))
            .cloned()
            .collect();
        pending.sort_by_key(|r| r.check_in_time);
        Ok(pending)
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        let mut history: Vec<AttendanceRecord> = self
            .records
            .lock()
            .values()
            .filter(|r| r.user_id == user_id && r.work_date >= from && r.work_date <= to)
            .cloned()
            .collect();
        history.sort_by_key(|r| r.work_date);
        Ok(history)
    }
}

#[derive(Default)]
pub struct InMemoryOfficeLocationStore {
    snapshot: Mutex<Option<OfficeLocationSnapshot>>,
}

impl InMemoryOfficeLocationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OfficeLocationStore for InMemoryOfficeLocationStore {
    async fn load(&self) -> AttendanceResult<Option<OfficeLocationSnapshot>> {
        Ok(self.snapshot.lock().clone())
    }

    async fn save(
        &self,
        location: &OfficeLocation,
        updated_by: Uuid,
        updated_at: DateTime<Utc>,
    ) -> AttendanceResult<OfficeLocationSnapshot> {
        let snapshot = OfficeLocationSnapshot {
            location: location.clone(),
            updated_by: Some(updated_by),
            updated_at,
        };
        *self.snapshot.lock() = Some(snapshot.clone());
        Ok(snapshot)
    }
}

/// Fixed manager → workers mapping, filled in by the caller.
#[derive(Default)]
pub struct InMemoryTeamDirectory {
    teams: Mutex<HashMap<Uuid, HashSet<Uuid>>>,
}

impl InMemoryTeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assign(&self, manager_id: Uuid, worker_id: Uuid) {
        self.teams
            .lock()
            .entry(manager_id)
            .or_default()
            .insert(worker_id);
    }
}

#[async_trait]
impl TeamDirectory for InMemoryTeamDirectory {
    async fn workers_managed_by(&self, manager_id: Uuid) -> AttendanceResult<HashSet<Uuid>> {
        Ok(self
            .teams
            .lock()
            .get(&manager_id)
            .cloned()
            .unwrap_or_default())
    }
}
