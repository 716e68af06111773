//! Like service

use std::sync::Arc;

use fanevent_domain::{Event, FanEventError, LikeStatus, Result};

use super::ports::LikeRepository;
use crate::access::Actor;
use crate::events::ports::EventRepository;

pub struct LikeService {
    events: Arc<dyn EventRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl LikeService {
    pub fn new(events: Arc<dyn EventRepository>, likes: Arc<dyn LikeRepository>) -> Self {
        Self { events, likes }
    }

    /// Like or unlike an approved event
    pub async fn toggle_like(&self, actor: &Actor, event_id: &str) -> Result<LikeStatus> {
        let event = self.require_visible(actor, event_id).await?;
        if !event.status.is_approved() {
            return Err(FanEventError::InvalidInput("only approved events can be liked".into()));
        }
        let liked = self.likes.toggle(event_id, &actor.user_id).await?;
        let like_count = self.likes.count(event_id).await?;
        Ok(LikeStatus { liked, like_count })
    }

    pub async fn like_status(&self, actor: &Actor, event_id: &str) -> Result<LikeStatus> {
        self.require_visible(actor, event_id).await?;
        Ok(LikeStatus {
            liked: self.likes.is_liked(event_id, &actor.user_id).await?,
            like_count: self.likes.count(event_id).await?,
        })
    }

    /// Approved events the caller has liked
    pub async fn liked_events(&self, actor: &Actor) -> Result<Vec<Event>> {
        let events = self.likes.liked_events(&actor.user_id).await?;
        Ok(events.into_iter().filter(|event| event.status.is_approved()).collect())
    }

    async fn require_visible(&self, actor: &Actor, event_id: &str) -> Result<Event> {
        match self.events.get(event_id).await? {
            Some(event) if event.is_visible_to(&actor.user_id, actor.role) => Ok(event),
            _ => Err(FanEventError::not_found("event", event_id)),
        }
    }
}
