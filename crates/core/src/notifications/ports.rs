//! Port interfaces for in-app notifications

use async_trait::async_trait;
use fanevent_domain::{Notification, Result};

#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification. Returns `false` without storing anything when
    /// the user already has a notification with the same dedup key.
    async fn create(&self, notification: Notification) -> Result<bool>;

    async fn get(&self, id: &str) -> Result<Option<Notification>>;

    /// Newest first
    async fn list(&self, user_id: &str, unread_only: bool, limit: u32)
        -> Result<Vec<Notification>>;

    async fn unread_count(&self, user_id: &str) -> Result<u32>;

    async fn mark_read(&self, id: &str) -> Result<bool>;

    /// Returns the number of notifications that changed
    async fn mark_all_read(&self, user_id: &str) -> Result<u32>;

    async fn delete(&self, id: &str) -> Result<bool>;
}
