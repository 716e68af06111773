//! Dashboard aggregates

use serde::{Deserialize, Serialize};

/// Record counts per moderation status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub pending: u32,
    pub approved: u32,
    pub rejected: u32,
}

/// User counts per role
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleCounts {
    pub users: u32,
    pub organizers: u32,
    pub admins: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminDashboard {
    pub users: RoleCounts,
    pub events: StatusCounts,
    pub groups: StatusCounts,
    pub pending_applications: u32,
    pub open_reports: u32,
    pub total_rsvps: u32,
    pub upcoming_events: u32,
}

/// Per-event engagement numbers for an organizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerEventStats {
    pub event_id: String,
    pub title: String,
    pub status: super::moderation::ModerationStatus,
    pub starts_at: chrono::DateTime<chrono::Utc>,
    pub rsvp_count: u32,
    pub checked_in_count: u32,
    pub like_count: u32,
    pub attendance_hours: f64,
}
