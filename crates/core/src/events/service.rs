//! Event service - creation, editing, search and summaries

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{
    RangeValidator, StringValidator, UrlValidator, ValidationError,
};
use fanevent_domain::constants::{
    CATEGORY_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, EVENT_TITLE_MAX_LENGTH, EVENT_TITLE_MIN_LENGTH,
    LOCATION_MAX_LENGTH,
};
use fanevent_domain::{
    new_id, Event, EventFilter, EventSummary, EventUpdate, FanEventError, ModerationStatus,
    NewEvent, Result,
};
use tracing::info;

use super::ports::EventRepository;
use crate::access::Actor;
use crate::attendance::ports::RsvpRepository;
use crate::groups::ports::GroupRepository;
use crate::likes::ports::LikeRepository;
use crate::validation::{clean_optional, ensure_valid};

pub struct EventService {
    events: Arc<dyn EventRepository>,
    groups: Arc<dyn GroupRepository>,
    rsvps: Arc<dyn RsvpRepository>,
    likes: Arc<dyn LikeRepository>,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        groups: Arc<dyn GroupRepository>,
        rsvps: Arc<dyn RsvpRepository>,
        likes: Arc<dyn LikeRepository>,
    ) -> Self {
        Self { events, groups, rsvps, likes }
    }

    /// Create an event. Admin-created events skip moderation.
    pub async fn create(&self, actor: &Actor, new_event: NewEvent) -> Result<Event> {
        actor.require_organizer()?;

        let now = Utc::now();
        let mut event = Event {
            id: new_id(),
            title: new_event.title.trim().to_string(),
            description: new_event.description.trim().to_string(),
            location: new_event.location.trim().to_string(),
            category: new_event.category.trim().to_string(),
            starts_at: new_event.starts_at,
            ends_at: new_event.ends_at,
            capacity: new_event.capacity,
            image_url: clean_optional(new_event.image_url),
            organizer_id: actor.user_id.clone(),
            group_id: clean_optional(new_event.group_id),
            status: ModerationStatus::Pending,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        };
        validate_event(&event)?;

        if let Some(group_id) = event.group_id.as_deref() {
            let group = self
                .groups
                .get(group_id)
                .await?
                .ok_or_else(|| FanEventError::not_found("group", group_id))?;
            if !group.status.is_approved() {
                return Err(FanEventError::InvalidInput(
                    "events can only be attached to approved groups".into(),
                ));
            }
            if !group.can_manage(&actor.user_id, actor.role) {
                return Err(FanEventError::Forbidden(
                    "only the group owner can add events to this group".into(),
                ));
            }
        }

        if actor.is_admin() {
            event.status = ModerationStatus::Approved;
        }

        self.events.create(event.clone()).await?;
        info!(event_id = %event.id, status = %event.status, "Created event");
        Ok(event)
    }

    /// Fetch an event the caller is allowed to see
    pub async fn get(&self, actor: &Actor, id: &str) -> Result<Event> {
        let event = self.require(id).await?;
        if !event.is_visible_to(&actor.user_id, actor.role) {
            return Err(FanEventError::not_found("event", id));
        }
        Ok(event)
    }

    /// Search approved events
    pub async fn list(&self, filter: &EventFilter) -> Result<Vec<Event>> {
        let events = self.events.list_by_status(ModerationStatus::Approved).await?;
        Ok(filter.apply(events, Utc::now()))
    }

    /// The caller's own events in any status
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Event>> {
        actor.require_organizer()?;
        self.events.list_by_organizer(&actor.user_id).await
    }

    /// Edit an event. Changes by anyone but an admin send an already
    /// reviewed event back to moderation.
    pub async fn update(&self, actor: &Actor, id: &str, update: EventUpdate) -> Result<Event> {
        let mut event = self.require_managed(actor, id).await?;

        update.apply_to(&mut event);
        event.title = event.title.trim().to_string();
        event.description = event.description.trim().to_string();
        event.location = event.location.trim().to_string();
        event.category = event.category.trim().to_string();
        event.image_url = clean_optional(event.image_url);
        validate_event(&event)?;

        if !actor.is_admin() && event.status != ModerationStatus::Pending {
            event.status = ModerationStatus::Pending;
            event.moderation_note = None;
        }
        event.updated_at = Utc::now();

        self.events.update(event.clone()).await?;
        info!(event_id = %event.id, status = %event.status, "Updated event");
        Ok(event)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<()> {
        self.require_managed(actor, id).await?;
        if !self.events.delete(id).await? {
            return Err(FanEventError::not_found("event", id));
        }
        info!(event_id = %id, "Deleted event");
        Ok(())
    }

    /// Event with engagement counters from the caller's point of view
    pub async fn summary(&self, actor: &Actor, id: &str) -> Result<EventSummary> {
        let event = self.get(actor, id).await?;

        let rsvp_count = self.rsvps.count_for_event(id).await?;
        let checked_in_count = self.rsvps.count_checked_in(id).await?;
        let like_count = self.likes.count(id).await?;
        let liked_by_me = self.likes.is_liked(id, &actor.user_id).await?;
        let rsvped_by_me = self.rsvps.get(id, &actor.user_id).await?.is_some();

        Ok(EventSummary {
            event,
            rsvp_count,
            checked_in_count,
            like_count,
            liked_by_me,
            rsvped_by_me,
        })
    }

    async fn require(&self, id: &str) -> Result<Event> {
        self.events.get(id).await?.ok_or_else(|| FanEventError::not_found("event", id))
    }

    async fn require_managed(&self, actor: &Actor, id: &str) -> Result<Event> {
        let event = self.require(id).await?;
        if !event.is_visible_to(&actor.user_id, actor.role) {
            return Err(FanEventError::not_found("event", id));
        }
        if !event.can_manage(&actor.user_id, actor.role) {
            return Err(FanEventError::Forbidden("only the organizer can change this event".into()));
        }
        Ok(event)
    }
}

fn validate_event(event: &Event) -> Result<()> {
    let mut errors = ValidationError::new();
    errors
        .check(
            "title",
            &StringValidator::bounded(EVENT_TITLE_MIN_LENGTH, EVENT_TITLE_MAX_LENGTH),
            event.title.as_str(),
        )
        .check(
            "description",
            &StringValidator::new().max_length(DESCRIPTION_MAX_LENGTH),
            event.description.as_str(),
        )
        .check(
            "location",
            &StringValidator::new().max_length(LOCATION_MAX_LENGTH),
            event.location.as_str(),
        )
        .check(
            "category",
            &StringValidator::new().max_length(CATEGORY_MAX_LENGTH),
            event.category.as_str(),
        )
        .check_optional("capacity", &RangeValidator::empty().min(1u32), event.capacity.as_ref())
        .check_optional("image_url", &UrlValidator::new(), event.image_url.as_deref());

    if let Some(ends_at) = event.ends_at {
        if ends_at <= event.starts_at {
            errors.add_field_error("ends_at", "must be after starts_at");
        }
    }

    ensure_valid(errors)
}
