//! Attendance hour computation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::rsvp::AttendanceRecord;

/// Hours between check-in and check-out, rounded to two decimals.
///
/// A check-out earlier than the check-in counts as zero.
pub fn attendance_hours(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    let seconds = (check_out - check_in).num_seconds().max(0);
    round_hours(seconds as f64 / 3600.0)
}

fn round_hours(hours: f64) -> f64 {
    (hours * 100.0).round() / 100.0
}

/// A user's attendance history with a running total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    pub records: Vec<AttendanceRecord>,
    pub total_hours: f64,
}

impl AttendanceSummary {
    pub fn from_records(records: Vec<AttendanceRecord>) -> Self {
        let total = records.iter().filter_map(|record| record.hours).sum::<f64>();
        Self { records, total_hours: round_hours(total) }
    }
}
