//! Port interfaces for event likes

use async_trait::async_trait;
use fanevent_domain::{Event, Result};

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Flip the like state and return whether the event is now liked
    async fn toggle(&self, event_id: &str, user_id: &str) -> Result<bool>;

    async fn count(&self, event_id: &str) -> Result<u32>;

    async fn is_liked(&self, event_id: &str, user_id: &str) -> Result<bool>;

    /// Events the user liked, most recently liked first
    async fn liked_events(&self, user_id: &str) -> Result<Vec<Event>>;
}
