//! Event reminder types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user's request to be notified `offset_minutes` before an event starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventReminder {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub offset_minutes: i64,
    pub created_at: DateTime<Utc>,
}

impl EventReminder {
    /// Key used to suppress duplicate reminder notifications.
    pub fn dedup_key(&self) -> String {
        format!("reminder:{}:{}", self.event_id, self.offset_minutes)
    }
}

/// Payload replacing the caller's reminder offsets for an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReminderOffsets {
    pub offsets: Vec<i64>,
}

/// Outcome of one reminder sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    pub events_scanned: usize,
    pub reminders_matched: usize,
    pub notifications_created: usize,
    pub duplicates_skipped: usize,
    /// Reminders whose notification could not be stored
    pub failures: usize,
}
