//! Port interfaces for aggregate statistics

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_domain::{AdminDashboard, OrganizerEventStats, Result};

/// Aggregate queries, computed by the store rather than in memory
#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Platform-wide counters; `now` decides which events are upcoming
    async fn admin_dashboard(&self, now: DateTime<Utc>) -> Result<AdminDashboard>;

    /// Engagement numbers for every event of the organizer, soonest first
    async fn organizer_event_stats(&self, organizer_id: &str) -> Result<Vec<OrganizerEventStats>>;
}
