//! Messaging service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{StringValidator, ValidationError};
use fanevent_domain::constants::{
    DEFAULT_MESSAGE_PAGE_SIZE, MESSAGE_MAX_LENGTH, MESSAGE_PREVIEW_LENGTH,
};
use fanevent_domain::{
    message_preview, new_id, Conversation, ConversationView, FanEventError, Message,
    Notification, NotificationKind, Result,
};
use tracing::{debug, warn};

use super::ports::ConversationRepository;
use crate::access::Actor;
use crate::notifications::ports::NotificationRepository;
use crate::users::ports::UserRepository;
use crate::validation::{ensure_valid, page_size};

pub struct MessagingService {
    conversations: Arc<dyn ConversationRepository>,
    users: Arc<dyn UserRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl MessagingService {
    pub fn new(
        conversations: Arc<dyn ConversationRepository>,
        users: Arc<dyn UserRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { conversations, users, notifications }
    }

    /// Find or create the direct conversation between the caller and
    /// `with_user`
    pub async fn open_conversation(
        &self,
        actor: &Actor,
        with_user: &str,
    ) -> Result<ConversationView> {
        if actor.is(with_user) {
            return Err(FanEventError::InvalidInput("cannot message yourself".into()));
        }
        if self.users.get_by_id(with_user).await?.is_none() {
            return Err(FanEventError::not_found("user", with_user));
        }

        let conversation = match self.conversations.find_direct(&actor.user_id, with_user).await? {
            Some(existing) => existing,
            None => {
                let mut participant_ids = vec![actor.user_id.clone(), with_user.to_string()];
                participant_ids.sort();
                let conversation = Conversation {
                    id: new_id(),
                    participant_ids,
                    last_message_preview: None,
                    last_message_at: None,
                    created_at: Utc::now(),
                };
                self.conversations.create(conversation.clone()).await?;
                debug!(conversation_id = %conversation.id, "Opened conversation");
                conversation
            }
        };

        let unread_count = self.conversations.unread_count(&conversation.id, &actor.user_id).await?;
        Ok(ConversationView { conversation, unread_count })
    }

    pub async fn list_conversations(&self, actor: &Actor) -> Result<Vec<ConversationView>> {
        self.conversations.list_for_user(&actor.user_id).await
    }

    /// Post a message and notify the other participants
    pub async fn send_message(
        &self,
        actor: &Actor,
        conversation_id: &str,
        body: &str,
    ) -> Result<Message> {
        let body = body.trim();
        let mut errors = ValidationError::new();
        errors.check("body", &StringValidator::bounded(1, MESSAGE_MAX_LENGTH), body);
        ensure_valid(errors)?;

        let conversation = self.require_participant(actor, conversation_id).await?;

        let message = Message {
            id: new_id(),
            conversation_id: conversation.id.clone(),
            sender_id: actor.user_id.clone(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let preview = message_preview(body, MESSAGE_PREVIEW_LENGTH);
        self.conversations.append_message(message.clone(), preview.clone()).await?;

        let sender_name = match self.users.get_by_id(&actor.user_id).await? {
            Some(profile) => profile.public_name().to_string(),
            None => "Someone".to_string(),
        };
        for recipient in conversation.others(&actor.user_id) {
            let notification = Notification::new(
                recipient,
                NotificationKind::NewMessage,
                format!("New message from {sender_name}"),
                preview.clone(),
            );
            if let Err(err) = self.notifications.create(notification).await {
                warn!(
                    error = %err,
                    conversation_id = %conversation.id,
                    "Failed to notify recipient"
                );
            }
        }

        Ok(message)
    }

    /// Latest `limit` messages before the `before` message, oldest first
    pub async fn messages(
        &self,
        actor: &Actor,
        conversation_id: &str,
        limit: Option<u32>,
        before: Option<&str>,
    ) -> Result<Vec<Message>> {
        self.require_participant(actor, conversation_id).await?;
        self.conversations
            .messages(conversation_id, page_size(limit, DEFAULT_MESSAGE_PAGE_SIZE), before)
            .await
    }

    pub async fn mark_read(&self, actor: &Actor, conversation_id: &str) -> Result<()> {
        self.require_participant(actor, conversation_id).await?;
        self.conversations.mark_read(conversation_id, &actor.user_id).await
    }

    pub async fn unread_total(&self, actor: &Actor) -> Result<u32> {
        self.conversations.unread_total(&actor.user_id).await
    }

    async fn require_participant(
        &self,
        actor: &Actor,
        conversation_id: &str,
    ) -> Result<Conversation> {
        let conversation = self
            .conversations
            .get(conversation_id)
            .await?
            .ok_or_else(|| FanEventError::not_found("conversation", conversation_id))?;
        if !conversation.has_participant(&actor.user_id) {
            return Err(FanEventError::Forbidden("not a participant of this conversation".into()));
        }
        Ok(conversation)
    }
}
