use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::database::models::{AttendanceRecord, AttendanceStatus};

/// Thresholds that turn session times into a status. Passed explicitly so a
/// policy change shows up on every record the next time it is read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttendancePolicy {
    /// Check-ins strictly after this local time are late.
    pub work_start_time: NaiveTime,
    /// Closed sessions with at most this many worked hours are half days.
    pub half_day_threshold_hours: f64,
    /// Office timezone; decides the calendar day and the local check-in time.
    pub utc_offset: FixedOffset,
}

impl AttendancePolicy {
    pub fn work_date(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.utc_offset).date_naive()
    }

    pub fn local_time(&self, at: DateTime<Utc>) -> NaiveTime {
        at.with_timezone(&self.utc_offset).time()
    }

    pub fn derive_status(&self, record: &AttendanceRecord) -> AttendanceStatus {
        derive_status(record, self)
    }
}

/// Pure classification of one session.
///
/// An open session is judged on its check-in alone; it never becomes `absent`
/// just because the worker has not checked out yet.
pub fn derive_status(record: &AttendanceRecord, policy: &AttendancePolicy) -> AttendanceStatus {
    let Some(check_in) = record.check_in_time else {
        return AttendanceStatus::Absent;
    };

    if let Some(worked) = record.worked_duration() {
        let worked_hours = worked.num_seconds() as f64 / 3600.0;
        if worked_hours <= policy.half_day_threshold_hours {
            return AttendanceStatus::HalfDay;
        }
    }

    if policy.local_time(check_in) > policy.work_start_time {
        AttendanceStatus::Late
    } else {
        AttendanceStatus::Present
    }
}
