//! Port interfaces for RSVPs and attendance

use async_trait::async_trait;
use fanevent_domain::{AttendanceRecord, Attendee, Result, Rsvp};

/// Result of an RSVP insert, decided atomically with the capacity check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RsvpOutcome {
    Created,
    AlreadyExists,
    Full,
}

#[async_trait]
pub trait RsvpRepository: Send + Sync {
    async fn get(&self, event_id: &str, user_id: &str) -> Result<Option<Rsvp>>;

    /// Insert the RSVP unless the user already has one or the event already
    /// holds `capacity` RSVPs.
    async fn create(&self, rsvp: Rsvp, capacity: Option<u32>) -> Result<RsvpOutcome>;

    /// Persist check-in/check-out timestamps
    async fn update(&self, rsvp: Rsvp) -> Result<()>;

    async fn delete(&self, event_id: &str, user_id: &str) -> Result<bool>;

    async fn count_for_event(&self, event_id: &str) -> Result<u32>;

    async fn count_checked_in(&self, event_id: &str) -> Result<u32>;

    /// The user's RSVPs, newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Rsvp>>;

    /// RSVPs joined with attendee profiles, in RSVP order
    async fn attendees(&self, event_id: &str) -> Result<Vec<Attendee>>;

    /// Checked-in RSVPs of the user joined with event titles, newest first
    async fn attendance_for_user(&self, user_id: &str) -> Result<Vec<AttendanceRecord>>;
}
