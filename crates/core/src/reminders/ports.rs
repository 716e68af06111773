//! Port interfaces for event reminders

use async_trait::async_trait;
use fanevent_domain::{EventReminder, Result};

#[async_trait]
pub trait ReminderRepository: Send + Sync {
    /// Replace every reminder the user has for the event with `reminders`
    async fn replace_for_event(
        &self,
        user_id: &str,
        event_id: &str,
        reminders: Vec<EventReminder>,
    ) -> Result<()>;

    async fn get(&self, id: &str) -> Result<Option<EventReminder>>;

    async fn delete(&self, id: &str) -> Result<bool>;

    /// Ordered by event then offset
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<EventReminder>>;

    async fn list_for_event(&self, event_id: &str) -> Result<Vec<EventReminder>>;
}
