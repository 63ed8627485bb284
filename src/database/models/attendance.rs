use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::location::Coordinates;
use super::macros::string_enum;

string_enum! {
    /// Manager sign-off state. Only remote check-ins ever leave `None`.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum ApprovalStatus {
        None => "none",
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

string_enum! {
    /// Classification computed on read from the session times; never stored.
    #[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
    #[serde(rename_all = "snake_case")]
    pub enum AttendanceStatus {
        Present => "present",
        Late => "late",
        Absent => "absent",
        HalfDay => "half_day",
    }
}

/// Outcome a manager may give a pending remote check-in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalDecision {
    Approved,
    Rejected,
}

impl From<ApprovalDecision> for ApprovalStatus {
    fn from(decision: ApprovalDecision) -> Self {
        match decision {
            ApprovalDecision::Approved => ApprovalStatus::Approved,
            ApprovalDecision::Rejected => ApprovalStatus::Rejected,
        }
    }
}

/// One worker's single work session for one calendar day.
///
/// Invariants kept by the lifecycle manager:
/// - `check_out_time`, when set, is strictly after `check_in_time`;
/// - `approval_status` is `None` whenever `is_remote` is false;
/// - at most one open session per worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub work_date: NaiveDate,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_location: Option<Coordinates>,
    pub check_out_location: Option<Coordinates>,
    /// Distance measured at check-in and the radius in force at that moment.
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

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_in_time.is_some() && self.check_out_time.is_none()
    }

    pub fn is_pending_approval(&self) -> bool {
        self.approval_status == ApprovalStatus::Pending
    }

    /// Whether reporting may count this record as attendance. Rejected remote
    /// sessions stay in storage for audit but never count; pending ones do not
    /// count until approved.
    pub fn counts_toward_attendance(&self) -> bool {
        self.check_in_time.is_some()
            && matches!(
                self.approval_status,
                ApprovalStatus::None | ApprovalStatus::Approved
            )
    }

    pub fn worked_duration(&self) -> Option<Duration> {
        match (self.check_in_time, self.check_out_time) {
            (Some(check_in), Some(check_out)) => Some(check_out - check_in),
            _ => None,
        }
    }
}

/// Record as served to clients: the stored fields plus the on-read status.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceView {
    #[serde(flatten)]
    pub record: AttendanceRecord,
    pub derived_status: AttendanceStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInInput {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub is_remote: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutInput {
    pub record_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResolutionInput {
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceQuery {
    pub user_id: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
