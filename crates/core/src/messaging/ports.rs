//! Port interfaces for conversations and messages

use async_trait::async_trait;
use fanevent_domain::{Conversation, ConversationView, Message, Result};

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Conversation>>;

    /// Two-person conversation between `a` and `b`, in either order
    async fn find_direct(&self, a: &str, b: &str) -> Result<Option<Conversation>>;

    /// Create the conversation and a zeroed unread counter per participant
    async fn create(&self, conversation: Conversation) -> Result<()>;

    /// The user's conversations with unread counts, most recent activity first
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ConversationView>>;

    async fn unread_count(&self, conversation_id: &str, user_id: &str) -> Result<u32>;

    /// Store a message, update the conversation preview and bump the unread
    /// counter of every participant except the sender, atomically.
    async fn append_message(&self, message: Message, preview: String) -> Result<()>;

    /// Up to `limit` messages older than the `before` message (or the newest
    /// ones), returned oldest first. Fails with NotFound when `before` is not
    /// a message of the conversation.
    async fn messages(
        &self,
        conversation_id: &str,
        limit: u32,
        before: Option<&str>,
    ) -> Result<Vec<Message>>;

    async fn get_message(&self, id: &str) -> Result<Option<Message>>;

    /// Reset the user's unread counter for the conversation
    async fn mark_read(&self, conversation_id: &str, user_id: &str) -> Result<()>;

    /// Sum of the user's unread counters
    async fn unread_total(&self, user_id: &str) -> Result<u32>;
}
