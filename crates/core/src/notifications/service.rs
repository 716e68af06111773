//! Notification inbox service

use std::sync::Arc;

use fanevent_domain::constants::DEFAULT_NOTIFICATION_PAGE_SIZE;
use fanevent_domain::{FanEventError, Notification, Result};

use super::ports::NotificationRepository;
use crate::access::Actor;
use crate::validation::page_size;

pub struct NotificationService {
    notifications: Arc<dyn NotificationRepository>,
}

impl NotificationService {
    pub fn new(notifications: Arc<dyn NotificationRepository>) -> Self {
        Self { notifications }
    }

    pub async fn list(
        &self,
        actor: &Actor,
        unread_only: bool,
        limit: Option<u32>,
    ) -> Result<Vec<Notification>> {
        self.notifications
            .list(&actor.user_id, unread_only, page_size(limit, DEFAULT_NOTIFICATION_PAGE_SIZE))
            .await
    }

    pub async fn unread_count(&self, actor: &Actor) -> Result<u32> {
        self.notifications.unread_count(&actor.user_id).await
    }

    pub async fn mark_read(&self, actor: &Actor, id: &str) -> Result<()> {
        self.require_owned(actor, id).await?;
        self.notifications.mark_read(id).await?;
        Ok(())
    }

    /// Returns how many notifications were marked
    pub async fn mark_all_read(&self, actor: &Actor) -> Result<u32> {
        self.notifications.mark_all_read(&actor.user_id).await
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<()> {
        self.require_owned(actor, id).await?;
        self.notifications.delete(id).await?;
        Ok(())
    }

    async fn require_owned(&self, actor: &Actor, id: &str) -> Result<Notification> {
        let notification = self
            .notifications
            .get(id)
            .await?
            .ok_or_else(|| FanEventError::not_found("notification", id))?;
        if notification.user_id != actor.user_id {
            return Err(FanEventError::Forbidden("notification belongs to another user".into()));
        }
        Ok(notification)
    }
}
