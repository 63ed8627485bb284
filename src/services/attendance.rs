use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::database::models::{
    ApprovalStatus, AttendanceRecord, AttendanceView, Coordinates,
};
use crate::database::store::{AttendanceStore, TeamDirectory};
use crate::error::{AttendanceError, AttendanceResult};
use crate::services::auth::Actor;
use crate::services::policy::AttendancePolicy;
use crate::services::radius_policy::RadiusPolicy;

/// Longest date range a single history read may cover.
pub const MAX_HISTORY_DAYS: i64 = 366;

/// Owns creation and closing of attendance sessions.
#[derive(Clone)]
pub struct AttendanceService {
    store: Arc<dyn AttendanceStore>,
    directory: Arc<dyn TeamDirectory>,
    radius: RadiusPolicy,
    policy: AttendancePolicy,
}

impl AttendanceService {
    pub fn new(
        store: Arc<dyn AttendanceStore>,
        directory: Arc<dyn TeamDirectory>,
        radius: RadiusPolicy,
        policy: AttendancePolicy,
    ) -> Self {
        Self {
            store,
            directory,
            radius,
            policy,
        }
    }

    pub fn policy(&self) -> &AttendancePolicy {
        &self.policy
    }

    pub fn radius_policy(&self) -> &RadiusPolicy {
        &self.radius
    }

    pub fn view(&self, record: AttendanceRecord) -> AttendanceView {
        let derived_status = self.policy.derive_status(&record);
        AttendanceView {
            record,
            derived_status,
        }
    }

    /// Open today's session for `user_id`.
    ///
    /// On-site check-ins must fall inside the office radius. Remote check-ins
    /// are accepted at any distance and wait for a manager's decision; the
    /// measured distance is kept on the record either way.
    pub async fn check_in(
        &self,
        user_id: Uuid,
        location: Coordinates,
        is_remote: bool,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceRecord> {
        let work_date = self.policy.work_date(now);

        // Early answer for the common retry; the insert below is authoritative
        if self.store.find_open_for_user(user_id).await?.is_some()
            || self.store.find_for_user_on(user_id, work_date).await?.is_some()
        {
            return Err(AttendanceError::AlreadyCheckedIn);
        }

        let check = self.radius.check(location)?;
        if !is_remote && !check.is_within {
            log::info!(
                "Rejected on-site check-in for {}: {:.0}m from office (allowed {:.0}m)",
                user_id,
                check.distance_meters,
                check.allowed_radius_meters
            );
            return Err(AttendanceError::OutOfRange {
                distance_meters: check.distance_meters,
                allowed_radius_meters: check.allowed_radius_meters,
            });
        }

        let approval_status = if is_remote {
            ApprovalStatus::Pending
        } else {
            ApprovalStatus::None
        };

        let record = AttendanceRecord {
            id: Uuid::new_v4(),
            user_id,
            work_date,
            check_in_time: Some(now),
            check_out_time: None,
            check_in_location: Some(location),
            check_out_location: None,
            check_in_distance_meters: Some(check.distance_meters),
            allowed_radius_meters: Some(check.allowed_radius_meters),
            is_remote,
            approval_status,
            resolved_by: None,
            resolution_notes: None,
            resolved_at: None,
            notes: notes.filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        };

        let record = self.store.insert_checked_in(record).await?;
        log::info!(
            "User {} checked in ({}), record {}",
            user_id,
            if is_remote { "remote, pending approval" } else { "on site" },
            record.id
        );

        Ok(record)
    }

    /// Close an open session. Exit is not geofenced; the location, when the
    /// client has one, is stored as reported.
    pub async fn check_out(
        &self,
        user_id: Uuid,
        record_id: Uuid,
        location: Option<Coordinates>,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceRecord> {
        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AttendanceError::record_not_found(record_id))?;

        if record.user_id != user_id {
            return Err(AttendanceError::Unauthorized(
                "cannot check out another worker's session".to_string(),
            ));
        }
        Self::ensure_closable(&record, now)?;

        match self.store.close_open(record_id, now, location).await? {
            Some(closed) => {
                log::info!("User {} checked out, record {}", user_id, closed.id);
                Ok(closed)
            }
            // Lost a race with another check-out of the same record
            None => match self.store.find_by_id(record_id).await? {
                Some(current) => {
                    Self::ensure_closable(&current, now)?;
                    Err(AttendanceError::AlreadyCheckedOut(record_id))
                }
                None => Err(AttendanceError::record_not_found(record_id)),
            },
        }
    }

    /// Close whichever session `user_id` currently has open.
    pub async fn check_out_open(
        &self,
        user_id: Uuid,
        location: Option<Coordinates>,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceRecord> {
        let open = self
            .store
            .find_open_for_user(user_id)
            .await?
            .ok_or_else(|| AttendanceError::NotFound("No open attendance session".to_string()))?;

        self.check_out(user_id, open.id, location, now).await
    }

    fn ensure_closable(record: &AttendanceRecord, now: DateTime<Utc>) -> AttendanceResult<()> {
        if record.check_out_time.is_some() {
            return Err(AttendanceError::AlreadyCheckedOut(record.id));
        }
        match record.check_in_time {
            Some(check_in) if check_in < now => Ok(()),
            _ => Err(AttendanceError::CheckOutBeforeCheckIn),
        }
    }

    /// The caller's record for the current office day, if any.
    pub async fn today(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> AttendanceResult<Option<AttendanceRecord>> {
        self.store
            .find_for_user_on(user_id, self.policy.work_date(now))
            .await
    }

    pub async fn get(&self, actor: &Actor, record_id: Uuid) -> AttendanceResult<AttendanceRecord> {
        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AttendanceError::record_not_found(record_id))?;

        self.authorize_read(actor, record.user_id).await?;
        Ok(record)
    }

    pub async fn history(
        &self,
        actor: &Actor,
        user_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AttendanceResult<Vec<AttendanceRecord>> {
        if from > to {
            return Err(AttendanceError::InvalidDateRange(format!(
                "from {} is after to {}",
                from, to
            )));
        }
        if (to - from).num_days() >= MAX_HISTORY_DAYS {
            return Err(AttendanceError::InvalidDateRange(format!(
                "at most {} days may be requested at once",
                MAX_HISTORY_DAYS
            )));
        }
        self.authorize_read(actor, user_id).await?;

        self.store.list_for_user(user_id, from, to).await
    }

    /// Workers read their own records, managers those of their team, admins all.
    async fn authorize_read(&self, actor: &Actor, owner: Uuid) -> AttendanceResult<()> {
        if actor.user_id == owner || actor.is_admin() {
            return Ok(());
        }
        if actor.is_manager()
            && self
                .directory
                .workers_managed_by(actor.user_id)
                .await?
                .contains(&owner)
        {
            return Ok(());
        }

        Err(AttendanceError::Unauthorized(
            "cannot view another worker's attendance".to_string(),
        ))
    }
}
