//! Port interfaces for organizer applications

use async_trait::async_trait;
use fanevent_domain::{ModerationStatus, OrganizerApplication, Result};

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<OrganizerApplication>>;

    async fn create(&self, application: OrganizerApplication) -> Result<()>;

    async fn update(&self, application: OrganizerApplication) -> Result<()>;

    async fn find_pending_for_user(&self, user_id: &str) -> Result<Option<OrganizerApplication>>;

    /// Newest first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<OrganizerApplication>>;

    /// Newest first, optionally restricted to one status
    async fn list(&self, status: Option<ModerationStatus>) -> Result<Vec<OrganizerApplication>>;
}
