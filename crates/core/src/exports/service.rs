//! CSV export service

use std::sync::Arc;

use chrono::{DateTime, SecondsFormat, Utc};
use fanevent_domain::{FanEventError, Result};
use tracing::info;

use crate::access::Actor;
use crate::attendance::ports::RsvpRepository;
use crate::events::ports::EventRepository;
use crate::users::ports::UserRepository;

/// Rendered CSV document with a suggested download name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub filename: String,
    pub content: String,
}

pub struct ExportService {
    events: Arc<dyn EventRepository>,
    rsvps: Arc<dyn RsvpRepository>,
    users: Arc<dyn UserRepository>,
}

impl ExportService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        rsvps: Arc<dyn RsvpRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self { events, rsvps, users }
    }

    /// Attendee sheet for one event (organizer or admin)
    pub async fn event_attendees_csv(&self, actor: &Actor, event_id: &str) -> Result<CsvExport> {
        let event = match self.events.get(event_id).await? {
            Some(event) if event.is_visible_to(&actor.user_id, actor.role) => event,
            _ => return Err(FanEventError::not_found("event", event_id)),
        };
        if !event.can_manage(&actor.user_id, actor.role) {
            return Err(FanEventError::Forbidden("only the organizer can export attendees".into()));
        }

        let attendees = self.rsvps.attendees(event_id).await?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "user_id",
                "display_name",
                "email",
                "rsvp_at",
                "checked_in_at",
                "checked_out_at",
                "hours",
            ])
            .map_err(csv_error)?;
        for attendee in &attendees {
            writer
                .write_record([
                    attendee.rsvp.user_id.clone(),
                    attendee.display_name.clone(),
                    attendee.email.clone(),
                    timestamp(attendee.rsvp.created_at),
                    optional_timestamp(attendee.rsvp.checked_in_at),
                    optional_timestamp(attendee.rsvp.checked_out_at),
                    attendee.hours.map(|h| format!("{h:.2}")).unwrap_or_default(),
                ])
                .map_err(csv_error)?;
        }

        info!(event_id = %event_id, rows = attendees.len(), "Exported attendees");
        Ok(CsvExport {
            filename: format!("event-{event_id}-attendees.csv"),
            content: finish(writer)?,
        })
    }

    /// Every event with its RSVP count (admin)
    pub async fn events_csv(&self, actor: &Actor) -> Result<CsvExport> {
        actor.require_admin()?;

        let events = self.events.list_all().await?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record([
                "id",
                "title",
                "category",
                "status",
                "starts_at",
                "organizer_id",
                "rsvp_count",
            ])
            .map_err(csv_error)?;
        for event in &events {
            let rsvp_count = self.rsvps.count_for_event(&event.id).await?;
            writer
                .write_record([
                    event.id.clone(),
                    event.title.clone(),
                    event.category.clone(),
                    event.status.to_string(),
                    timestamp(event.starts_at),
                    event.organizer_id.clone(),
                    rsvp_count.to_string(),
                ])
                .map_err(csv_error)?;
        }

        info!(rows = events.len(), "Exported events");
        Ok(CsvExport { filename: "events.csv".into(), content: finish(writer)? })
    }

    /// Every user profile (admin)
    pub async fn users_csv(&self, actor: &Actor) -> Result<CsvExport> {
        actor.require_admin()?;

        let users = self.users.list_all().await?;
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["id", "email", "display_name", "role", "created_at"])
            .map_err(csv_error)?;
        for user in &users {
            writer
                .write_record([
                    user.id.clone(),
                    user.email.clone(),
                    user.display_name.clone().unwrap_or_default(),
                    user.role.to_string(),
                    timestamp(user.created_at),
                ])
                .map_err(csv_error)?;
        }

        info!(rows = users.len(), "Exported users");
        Ok(CsvExport { filename: "users.csv".into(), content: finish(writer)? })
    }
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn optional_timestamp(at: Option<DateTime<Utc>>) -> String {
    at.map(timestamp).unwrap_or_default()
}

fn csv_error(err: csv::Error) -> FanEventError {
    FanEventError::Internal(format!("CSV write failed: {err}"))
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|err| FanEventError::Internal(format!("CSV flush failed: {err}")))?;
    String::from_utf8(bytes).map_err(|err| FanEventError::Internal(err.to_string()))
}
