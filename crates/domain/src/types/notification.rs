//! In-app notification types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    EventReminder,
    EventApproved,
    EventRejected,
    GroupApproved,
    GroupRejected,
    OrganizerApproved,
    OrganizerRejected,
    NewMessage,
    ReportResolved,
}

impl_domain_status_conversions!(NotificationKind {
    EventReminder => "event_reminder",
    EventApproved => "event_approved",
    EventRejected => "event_rejected",
    GroupApproved => "group_approved",
    GroupRejected => "group_rejected",
    OrganizerApproved => "organizer_approved",
    OrganizerRejected => "organizer_rejected",
    NewMessage => "new_message",
    ReportResolved => "report_resolved",
});

/// Notification addressed to a single user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub event_id: Option<String>,
    /// Unique per user; a second notification with the same key is dropped.
    pub dedup_key: Option<String>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: super::new_id(),
            user_id: user_id.into(),
            kind,
            title: title.into(),
            body: body.into(),
            event_id: None,
            dedup_key: None,
            read: false,
            created_at: Utc::now(),
        }
    }

    pub fn with_event(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    pub fn with_dedup_key(mut self, key: impl Into<String>) -> Self {
        self.dedup_key = Some(key.into());
        self
    }

    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }
}
