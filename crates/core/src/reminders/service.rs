//! Reminder service
//!
//! Users pick offsets (minutes before start) per event. The sweep runs on a
//! schedule, finds approved events starting within the lookahead window and
//! emits one `event_reminder` notification per stored offset once the event
//! is that close. Notifications are keyed by event and offset, so a reminder
//! fires at most once per user even when sweeps overlap or one is missed.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fanevent_common::validation::{RangeValidator, ValidationError};
use fanevent_domain::constants::{
    MAX_REMINDERS_PER_EVENT, REMINDER_MAX_OFFSET_MINUTES, REMINDER_MIN_OFFSET_MINUTES,
};
use fanevent_domain::{
    new_id, Event, EventReminder, FanEventError, Notification, NotificationKind, Result,
    SweepReport,
};
use tracing::{debug, info, instrument, warn};

use super::ports::ReminderRepository;
use crate::access::Actor;
use crate::events::ports::EventRepository;
use crate::notifications::ports::NotificationRepository;
use crate::validation::ensure_valid;

pub struct ReminderService {
    events: Arc<dyn EventRepository>,
    reminders: Arc<dyn ReminderRepository>,
    notifications: Arc<dyn NotificationRepository>,
    lookahead: Duration,
}

impl ReminderService {
    /// `lookahead_minutes` is raised to the largest allowed offset so no
    /// stored reminder can fall outside the scanned window.
    pub fn new(
        events: Arc<dyn EventRepository>,
        reminders: Arc<dyn ReminderRepository>,
        notifications: Arc<dyn NotificationRepository>,
        lookahead_minutes: i64,
    ) -> Self {
        let lookahead = Duration::minutes(lookahead_minutes.max(REMINDER_MAX_OFFSET_MINUTES));
        Self { events, reminders, notifications, lookahead }
    }

    /// Replace the caller's offsets for an event. Duplicates collapse; an
    /// empty list clears every reminder.
    pub async fn set_reminders(
        &self,
        actor: &Actor,
        event_id: &str,
        offsets: Vec<i64>,
    ) -> Result<Vec<EventReminder>> {
        let offsets: BTreeSet<i64> = offsets.into_iter().collect();

        let mut errors = ValidationError::new();
        let range = RangeValidator::new(REMINDER_MIN_OFFSET_MINUTES, REMINDER_MAX_OFFSET_MINUTES);
        for offset in &offsets {
            errors.check("offsets", &range, offset);
        }
        if offsets.len() > MAX_REMINDERS_PER_EVENT {
            errors.add_field_error(
                "offsets",
                format!("at most {MAX_REMINDERS_PER_EVENT} reminders per event"),
            );
        }
        ensure_valid(errors)?;

        let event = match self.events.get(event_id).await? {
            Some(event) if event.is_visible_to(&actor.user_id, actor.role) => event,
            _ => return Err(FanEventError::not_found("event", event_id)),
        };
        if !event.status.is_approved() {
            return Err(FanEventError::InvalidInput(
                "reminders can only be set for approved events".into(),
            ));
        }
        let now = Utc::now();
        if !offsets.is_empty() && event.starts_at <= now {
            return Err(FanEventError::InvalidInput("event has already started".into()));
        }

        let reminders: Vec<EventReminder> = offsets
            .into_iter()
            .map(|offset_minutes| EventReminder {
                id: new_id(),
                user_id: actor.user_id.clone(),
                event_id: event.id.clone(),
                offset_minutes,
                created_at: now,
            })
            .collect();
        self.reminders.replace_for_event(&actor.user_id, &event.id, reminders.clone()).await?;
        debug!(event_id = %event.id, count = reminders.len(), "Reminders replaced");
        Ok(reminders)
    }

    pub async fn my_reminders(&self, actor: &Actor) -> Result<Vec<EventReminder>> {
        self.reminders.list_for_user(&actor.user_id).await
    }

    pub async fn delete_reminder(&self, actor: &Actor, id: &str) -> Result<()> {
        let reminder = self
            .reminders
            .get(id)
            .await?
            .ok_or_else(|| FanEventError::not_found("reminder", id))?;
        if reminder.user_id != actor.user_id {
            return Err(FanEventError::Forbidden("reminder belongs to another user".into()));
        }
        self.reminders.delete(id).await?;
        Ok(())
    }

    /// Emit every reminder that is due at `now`
    ///
    /// Only the event scan can fail the sweep. A failure for one event or
    /// reminder is logged and counted, and the sweep moves on.
    #[instrument(skip(self))]
    pub async fn sweep(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let events = self.events.list_approved_starting_between(now, now + self.lookahead).await?;
        let mut report = SweepReport { events_scanned: events.len(), ..SweepReport::default() };

        for event in &events {
            let until = minutes_until(event.starts_at, now);
            let reminders = match self.reminders.list_for_event(&event.id).await {
                Ok(reminders) => reminders,
                Err(err) => {
                    warn!(event_id = %event.id, error = %err, "Failed to load reminders");
                    report.failures += 1;
                    continue;
                }
            };

            for reminder in reminders {
                if until > reminder.offset_minutes {
                    continue;
                }
                report.reminders_matched += 1;

                let notification = reminder_notification(event, &reminder, until, now);
                match self.notifications.create(notification).await {
                    Ok(true) => report.notifications_created += 1,
                    Ok(false) => report.duplicates_skipped += 1,
                    Err(err) => {
                        warn!(
                            reminder_id = %reminder.id,
                            user_id = %reminder.user_id,
                            error = %err,
                            "Failed to store reminder notification"
                        );
                        report.failures += 1;
                    }
                }
            }
        }

        if report.notifications_created > 0 {
            info!(
                events = report.events_scanned,
                created = report.notifications_created,
                skipped = report.duplicates_skipped,
                failed = report.failures,
                "Reminder sweep sent notifications"
            );
        } else {
            debug!(events = report.events_scanned, "Reminder sweep found nothing due");
        }
        Ok(report)
    }
}

/// Whole minutes until `starts_at`, rounded up.
fn minutes_until(starts_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let seconds = (starts_at - now).num_seconds();
    (seconds + 59).div_euclid(60)
}

fn reminder_notification(
    event: &Event,
    reminder: &EventReminder,
    minutes_left: i64,
    now: DateTime<Utc>,
) -> Notification {
    Notification::new(
        &reminder.user_id,
        NotificationKind::EventReminder,
        format!("Reminder: {}", event.title),
        format!("Starts in {}", humanize_minutes(minutes_left)),
    )
    .with_event(&event.id)
    .with_dedup_key(reminder.dedup_key())
    .created_at(now)
}

fn humanize_minutes(minutes: i64) -> String {
    let (days, hours, mins) = (minutes / 1440, (minutes % 1440) / 60, minutes % 60);
    let mut parts = Vec::new();
    if days > 0 {
        parts.push(format!("{days}d"));
    }
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if mins > 0 || parts.is_empty() {
        parts.push(format!("{mins}m"));
    }
    parts.join(" ")
}
