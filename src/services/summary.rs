use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{ApprovalStatus, AttendanceRecord, AttendanceStatus};
use crate::services::policy::AttendancePolicy;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub user_id: Uuid,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub working_days: u32,
    pub present: u32,
    pub late: u32,
    pub half_day: u32,
    pub absent: u32,
    pub pending_approval: u32,
    pub rejected: u32,
    /// Percentage of working days with a counted session.
    pub attendance_rate: f64,
}

fn is_working_day(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

fn working_days_between(from: NaiveDate, to: NaiveDate) -> u32 {
    from.iter_days()
        .take_while(|d| *d <= to)
        .filter(|d| is_working_day(*d))
        .count() as u32
}

/// Attendance statistics for one worker over `[from, to]`.
///
/// Rejected remote check-ins never count. Pending ones are reported apart and
/// their day is neither attended nor absent until a manager decides. Absence is
/// not stored anywhere: it is every working day with no session at all.
pub fn summarize(
    user_id: Uuid,
    records: &[AttendanceRecord],
    from: NaiveDate,
    to: NaiveDate,
    policy: &AttendancePolicy,
) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        user_id,
        from,
        to,
        working_days: 0,
        present: 0,
        late: 0,
        half_day: 0,
        absent: 0,
        pending_approval: 0,
        rejected: 0,
        attendance_rate: 0.0,
    };
    if from > to {
        return summary;
    }

    let mut attended_days = HashSet::new();
    let mut undecided_days = HashSet::new();

    let in_range = records
        .iter()
        .filter(|r| r.user_id == user_id && r.work_date >= from && r.work_date <= to);

    for record in in_range {
        match record.approval_status {
            ApprovalStatus::Rejected => {
                summary.rejected += 1;
                continue;
            }
            ApprovalStatus::Pending => {
                summary.pending_approval += 1;
                undecided_days.insert(record.work_date);
                continue;
            }
            ApprovalStatus::None | ApprovalStatus::Approved => {}
        }
        if !record.counts_toward_attendance() {
            continue;
        }

        match policy.derive_status(record) {
            AttendanceStatus::Present => summary.present += 1,
            AttendanceStatus::Late => summary.late += 1,
            AttendanceStatus::HalfDay => summary.half_day += 1,
            AttendanceStatus::Absent => continue,
        }
        if is_working_day(record.work_date) {
            attended_days.insert(record.work_date);
        }
    }

    summary.working_days = working_days_between(from, to);
    let undecided = undecided_days
        .iter()
        .filter(|d| is_working_day(**d) && !attended_days.contains(*d))
        .count() as u32;
    let attended = attended_days.len() as u32;
    summary.absent = summary.working_days.saturating_sub(attended + undecided);
    summary.attendance_rate = if summary.working_days > 0 {
        (attended as f64 / summary.working_days as f64) * 100.0
    } else {
        0.0
    };

    summary
}
