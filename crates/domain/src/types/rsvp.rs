//! RSVP and attendance types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::attendance::attendance_hours;

/// A user's commitment to attend an event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rsvp {
    pub id: String,
    pub event_id: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub checked_out_at: Option<DateTime<Utc>>,
}

impl Rsvp {
    /// Hours attended, available once both timestamps are recorded.
    pub fn hours(&self) -> Option<f64> {
        match (self.checked_in_at, self.checked_out_at) {
            (Some(check_in), Some(check_out)) => Some(attendance_hours(check_in, check_out)),
            _ => None,
        }
    }
}

/// RSVP joined with the attendee's profile, for organizer views and exports
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendee {
    #[serde(flatten)]
    pub rsvp: Rsvp,
    pub display_name: String,
    pub email: String,
    pub hours: Option<f64>,
}

/// One attended event in a user's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub event_id: String,
    pub event_title: String,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub hours: Option<f64>,
}
