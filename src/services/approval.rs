use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{ApprovalDecision, ApprovalStatus, AttendanceRecord};
use crate::database::store::{AttendanceStore, TeamDirectory};
use crate::error::{AttendanceError, AttendanceResult};
use crate::services::auth::Actor;

/// Manager sign-off for remote check-ins: `pending -> approved | rejected`.
///
/// Only ever touches the approval fields of a record; times and locations
/// belong to the lifecycle manager.
#[derive(Clone)]
pub struct ApprovalWorkflow {
    store: Arc<dyn AttendanceStore>,
    directory: Arc<dyn TeamDirectory>,
}

impl ApprovalWorkflow {
    pub fn new(store: Arc<dyn AttendanceStore>, directory: Arc<dyn TeamDirectory>) -> Self {
        Self { store, directory }
    }

    /// Pending remote check-ins of the workers in the manager's scope. Each
    /// call re-reads storage, so callers simply ask again to refresh.
    pub async fn list_pending(&self, manager: &Actor) -> AttendanceResult<Vec<AttendanceRecord>> {
        Self::require_approver(manager)?;

        let scope = self.directory.workers_managed_by(manager.user_id).await?;
        self.store.list_pending_for_users(&scope).await
    }

    pub async fn resolve(
        &self,
        manager: &Actor,
        record_id: Uuid,
        decision: ApprovalDecision,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> AttendanceResult<AttendanceRecord> {
        Self::require_approver(manager)?;

        let record = self
            .store
            .find_by_id(record_id)
            .await?
            .ok_or_else(|| AttendanceError::record_not_found(record_id))?;

        if record.user_id == manager.user_id {
            return Err(AttendanceError::Unauthorized(
                "cannot resolve your own check-in".to_string(),
            ));
        }
        let scope = self.directory.workers_managed_by(manager.user_id).await?;
        if !scope.contains(&record.user_id) {
            return Err(AttendanceError::Unauthorized(
                "worker is not in your team".to_string(),
            ));
        }

        match record.approval_status {
            ApprovalStatus::Pending => {}
            ApprovalStatus::Approved | ApprovalStatus::Rejected => {
                return Err(AttendanceError::AlreadyResolved(record_id));
            }
            ApprovalStatus::None => {
                return Err(AttendanceError::NotFound(format!(
                    "Attendance record {} has no approval request",
                    record_id
                )));
            }
        }

        let status = ApprovalStatus::from(decision);
        let notes = notes.filter(|n| !n.trim().is_empty());
        let resolved = self
            .store
            .resolve_pending(record_id, status, manager.user_id, notes, now)
            .await?
            // Someone else resolved it between our read and write
            .ok_or(AttendanceError::AlreadyResolved(record_id))?;

        log::info!(
            "Remote check-in {} for user {} {} by {}",
            resolved.id,
            resolved.user_id,
            status,
            manager.user_id
        );

        Ok(resolved)
    }

    fn require_approver(actor: &Actor) -> AttendanceResult<()> {
        if actor.is_manager_or_admin() {
            Ok(())
        } else {
            Err(AttendanceError::Unauthorized(
                "only managers can review remote check-ins".to_string(),
            ))
        }
    }
}
