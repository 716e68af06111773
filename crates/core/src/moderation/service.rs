//! Moderation service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{StringValidator, ValidationError};
use fanevent_domain::constants::MODERATION_NOTE_MAX_LENGTH;
use fanevent_domain::{
    Event, FanEventError, Group, ModerationDecision, ModerationRequest, ModerationStatus,
    Notification, NotificationKind, Result,
};
use tracing::{info, warn};

use crate::access::Actor;
use crate::events::ports::EventRepository;
use crate::groups::ports::GroupRepository;
use crate::notifications::ports::NotificationRepository;
use crate::validation::{clean_optional, ensure_valid};

pub struct ModerationService {
    events: Arc<dyn EventRepository>,
    groups: Arc<dyn GroupRepository>,
    notifications: Arc<dyn NotificationRepository>,
}

impl ModerationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        groups: Arc<dyn GroupRepository>,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { events, groups, notifications }
    }

    pub async fn pending_events(&self, actor: &Actor) -> Result<Vec<Event>> {
        actor.require_admin()?;
        self.events.list_by_status(ModerationStatus::Pending).await
    }

    pub async fn pending_groups(&self, actor: &Actor) -> Result<Vec<Group>> {
        actor.require_admin()?;
        self.groups.list_by_status(ModerationStatus::Pending).await
    }

    pub async fn moderate_event(
        &self,
        actor: &Actor,
        id: &str,
        request: ModerationRequest,
    ) -> Result<Event> {
        actor.require_admin()?;
        let note = validated_note(request.note)?;

        let mut event =
            self.events.get(id).await?.ok_or_else(|| FanEventError::not_found("event", id))?;
        event.status = event.status.apply(request.decision)?;
        event.moderation_note = note;
        event.updated_at = Utc::now();
        self.events.update(event.clone()).await?;
        info!(event_id = %id, status = %event.status, "Moderated event");

        let (kind, verdict) = match request.decision {
            ModerationDecision::Approve => (NotificationKind::EventApproved, "approved"),
            ModerationDecision::Reject => (NotificationKind::EventRejected, "rejected"),
        };
        let notification = Notification::new(
            &event.organizer_id,
            kind,
            format!("Your event was {verdict}"),
            describe(&event.title, event.moderation_note.as_deref()),
        )
        .with_event(&event.id);
        self.notify(notification).await;

        Ok(event)
    }

    pub async fn moderate_group(
        &self,
        actor: &Actor,
        id: &str,
        request: ModerationRequest,
    ) -> Result<Group> {
        actor.require_admin()?;
        let note = validated_note(request.note)?;

        let mut group =
            self.groups.get(id).await?.ok_or_else(|| FanEventError::not_found("group", id))?;
        group.status = group.status.apply(request.decision)?;
        group.moderation_note = note;
        group.updated_at = Utc::now();
        self.groups.update(group.clone()).await?;
        info!(group_id = %id, status = %group.status, "Moderated group");

        let (kind, verdict) = match request.decision {
            ModerationDecision::Approve => (NotificationKind::GroupApproved, "approved"),
            ModerationDecision::Reject => (NotificationKind::GroupRejected, "rejected"),
        };
        let notification = Notification::new(
            &group.owner_id,
            kind,
            format!("Your group was {verdict}"),
            describe(&group.name, group.moderation_note.as_deref()),
        );
        self.notify(notification).await;

        Ok(group)
    }

    // Decision is already persisted; notification failures are only logged.
    async fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifications.create(notification).await {
            warn!(error = %err, "Failed to store moderation notification");
        }
    }
}

fn validated_note(note: Option<String>) -> Result<Option<String>> {
    let note = clean_optional(note);
    let mut errors = ValidationError::new();
    errors.check_optional(
        "note",
        &StringValidator::new().max_length(MODERATION_NOTE_MAX_LENGTH),
        note.as_deref(),
    );
    ensure_valid(errors)?;
    Ok(note)
}

fn describe(name: &str, note: Option<&str>) -> String {
    match note {
        Some(note) => format!("\"{name}\": {note}"),
        None => format!("\"{name}\""),
    }
}
