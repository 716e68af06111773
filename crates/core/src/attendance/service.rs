//! RSVP and attendance service

use std::sync::Arc;

use chrono::{Duration, Utc};
use fanevent_domain::constants::SELF_CHECK_IN_WINDOW_MINUTES;
use fanevent_domain::{
    new_id, AttendanceSummary, Attendee, Event, FanEventError, Result, Rsvp,
};
use tracing::info;

use super::ports::{RsvpOutcome, RsvpRepository};
use crate::access::Actor;
use crate::events::ports::EventRepository;

pub struct RsvpService {
    events: Arc<dyn EventRepository>,
    rsvps: Arc<dyn RsvpRepository>,
}

impl RsvpService {
    pub fn new(events: Arc<dyn EventRepository>, rsvps: Arc<dyn RsvpRepository>) -> Self {
        Self { events, rsvps }
    }

    /// RSVP the caller to an approved event that has not ended yet
    pub async fn rsvp(&self, actor: &Actor, event_id: &str) -> Result<Rsvp> {
        let event = self.require_visible(actor, event_id).await?;
        if !event.status.is_approved() {
            return Err(FanEventError::InvalidInput("event is not open for RSVPs".into()));
        }
        let now = Utc::now();
        if event.has_ended(now) {
            return Err(FanEventError::InvalidInput("event has already ended".into()));
        }

        let rsvp = Rsvp {
            id: new_id(),
            event_id: event.id.clone(),
            user_id: actor.user_id.clone(),
            created_at: now,
            checked_in_at: None,
            checked_out_at: None,
        };

        match self.rsvps.create(rsvp.clone(), event.capacity).await? {
            RsvpOutcome::Created => {
                info!(event_id = %event.id, user_id = %actor.user_id, "RSVP created");
                Ok(rsvp)
            }
            RsvpOutcome::AlreadyExists => {
                Err(FanEventError::Conflict("already RSVPed to this event".into()))
            }
            RsvpOutcome::Full => Err(FanEventError::Conflict("event is at capacity".into())),
        }
    }

    pub async fn cancel_rsvp(&self, actor: &Actor, event_id: &str) -> Result<()> {
        let rsvp = self
            .rsvps
            .get(event_id, &actor.user_id)
            .await?
            .ok_or_else(|| FanEventError::NotFound("no RSVP for this event".into()))?;
        if rsvp.checked_in_at.is_some() {
            return Err(FanEventError::InvalidInput("cannot cancel after checking in".into()));
        }
        self.rsvps.delete(event_id, &actor.user_id).await?;
        info!(event_id = %event_id, user_id = %actor.user_id, "RSVP cancelled");
        Ok(())
    }

    pub async fn my_rsvps(&self, actor: &Actor) -> Result<Vec<Rsvp>> {
        self.rsvps.list_for_user(&actor.user_id).await
    }

    /// Attendee list for the organizer or an admin
    pub async fn attendees(&self, actor: &Actor, event_id: &str) -> Result<Vec<Attendee>> {
        self.require_managed(actor, event_id).await?;
        self.rsvps.attendees(event_id).await
    }

    /// Check a user in. Attendees may check themselves in from shortly
    /// before the start; organizers and admins at any time.
    pub async fn check_in(&self, actor: &Actor, event_id: &str, user_id: &str) -> Result<Rsvp> {
        let event = self.require_visible(actor, event_id).await?;
        let manages = event.can_manage(&actor.user_id, actor.role);
        let now = Utc::now();

        if !manages {
            if !actor.is(user_id) {
                return Err(FanEventError::Forbidden(
                    "only the organizer can check in other attendees".into(),
                ));
            }
            let opens_at = event.starts_at - Duration::minutes(SELF_CHECK_IN_WINDOW_MINUTES);
            if now < opens_at {
                return Err(FanEventError::InvalidInput(format!(
                    "check-in opens {SELF_CHECK_IN_WINDOW_MINUTES} minutes before the event"
                )));
            }
        }

        let mut rsvp = self.require_rsvp(event_id, user_id).await?;
        if rsvp.checked_in_at.is_some() {
            return Err(FanEventError::Conflict("already checked in".into()));
        }
        rsvp.checked_in_at = Some(now);
        self.rsvps.update(rsvp.clone()).await?;
        info!(event_id = %event_id, user_id = %user_id, "Checked in");
        Ok(rsvp)
    }

    pub async fn check_out(&self, actor: &Actor, event_id: &str, user_id: &str) -> Result<Rsvp> {
        let event = self.require_visible(actor, event_id).await?;
        if !actor.is(user_id) && !event.can_manage(&actor.user_id, actor.role) {
            return Err(FanEventError::Forbidden(
                "only the organizer can check out other attendees".into(),
            ));
        }

        let mut rsvp = self.require_rsvp(event_id, user_id).await?;
        let Some(checked_in_at) = rsvp.checked_in_at else {
            return Err(FanEventError::InvalidInput("not checked in".into()));
        };
        if rsvp.checked_out_at.is_some() {
            return Err(FanEventError::Conflict("already checked out".into()));
        }

        rsvp.checked_out_at = Some(Utc::now().max(checked_in_at));
        self.rsvps.update(rsvp.clone()).await?;
        info!(event_id = %event_id, user_id = %user_id, hours = ?rsvp.hours(), "Checked out");
        Ok(rsvp)
    }

    /// Per-event hours and the running total for the caller
    pub async fn my_attendance(&self, actor: &Actor) -> Result<AttendanceSummary> {
        let records = self.rsvps.attendance_for_user(&actor.user_id).await?;
        Ok(AttendanceSummary::from_records(records))
    }

    async fn require_visible(&self, actor: &Actor, event_id: &str) -> Result<Event> {
        match self.events.get(event_id).await? {
            Some(event) if event.is_visible_to(&actor.user_id, actor.role) => Ok(event),
            _ => Err(FanEventError::not_found("event", event_id)),
        }
    }

    async fn require_managed(&self, actor: &Actor, event_id: &str) -> Result<Event> {
        let event = self.require_visible(actor, event_id).await?;
        if !event.can_manage(&actor.user_id, actor.role) {
            return Err(FanEventError::Forbidden("only the organizer can view attendees".into()));
        }
        Ok(event)
    }

    async fn require_rsvp(&self, event_id: &str, user_id: &str) -> Result<Rsvp> {
        self.rsvps
            .get(event_id, user_id)
            .await?
            .ok_or_else(|| FanEventError::InvalidInput("user has not RSVPed to this event".into()))
    }
}
