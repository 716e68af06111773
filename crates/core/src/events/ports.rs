//! Port interfaces for event storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_domain::{Event, ModerationStatus, Result};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Event>>;

    async fn create(&self, event: Event) -> Result<()>;

    async fn update(&self, event: Event) -> Result<()>;

    /// Delete an event together with its RSVPs, likes and reminders.
    /// Returns `false` when no such event exists.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn list_by_status(&self, status: ModerationStatus) -> Result<Vec<Event>>;

    async fn list_by_organizer(&self, organizer_id: &str) -> Result<Vec<Event>>;

    async fn list_by_group(&self, group_id: &str) -> Result<Vec<Event>>;

    /// Approved events with `from < starts_at <= to`, soonest first
    async fn list_approved_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Event>>;

    async fn list_all(&self) -> Result<Vec<Event>>;
}
