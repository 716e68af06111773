//! Event types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::moderation::ModerationStatus;
use super::user::Role;

/// A fan event created by an organizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub category: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub capacity: Option<u32>,
    pub image_url: Option<String>,
    pub organizer_id: String,
    pub group_id: Option<String>,
    pub status: ModerationStatus,
    pub moderation_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Approved events are public; anything else is only visible to the
    /// organizer and admins.
    pub fn is_visible_to(&self, user_id: &str, role: Role) -> bool {
        self.status.is_approved() || role.is_admin() || self.organizer_id == user_id
    }

    pub fn can_manage(&self, user_id: &str, role: Role) -> bool {
        role.is_admin() || self.organizer_id == user_id
    }

    /// End of the event; events without an explicit end finish at start.
    pub fn effective_end(&self) -> DateTime<Utc> {
        self.ends_at.unwrap_or(self.starts_at)
    }

    pub fn has_ended(&self, now: DateTime<Utc>) -> bool {
        now > self.effective_end()
    }

    /// Lowercased haystack used by free-text search.
    pub fn search_text(&self) -> String {
        format!("{} {} {} {}", self.title, self.description, self.location, self.category)
            .to_lowercase()
    }
}

/// Payload for creating an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub category: String,
    pub starts_at: DateTime<Utc>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub capacity: Option<u32>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
}

/// Partial update; absent fields are left untouched
///
/// The optional event fields take `Some(None)` (JSON `null`) to clear the
/// stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub category: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub ends_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub capacity: Option<Option<u32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub image_url: Option<Option<String>>,
}

impl EventUpdate {
    pub fn apply_to(self, event: &mut Event) {
        if let Some(title) = self.title {
            event.title = title;
        }
        if let Some(description) = self.description {
            event.description = description;
        }
        if let Some(location) = self.location {
            event.location = location;
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(starts_at) = self.starts_at {
            event.starts_at = starts_at;
        }
        if let Some(ends_at) = self.ends_at {
            event.ends_at = ends_at;
        }
        if let Some(capacity) = self.capacity {
            event.capacity = capacity;
        }
        if let Some(image_url) = self.image_url {
            event.image_url = image_url;
        }
    }
}

/// Event enriched with engagement counters for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(flatten)]
    pub event: Event,
    pub rsvp_count: u32,
    pub checked_in_count: u32,
    pub like_count: u32,
    pub liked_by_me: bool,
    pub rsvped_by_me: bool,
}

/// Result of toggling a like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: u32,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn sample_event() -> Event {
        let now = Utc::now();
        Event {
            id: "e1".into(),
            title: "Finals Watch Party".into(),
            description: "Big screen, loud crowd".into(),
            location: "Riverside Hall".into(),
            category: "Sports".into(),
            starts_at: now + Duration::hours(2),
            ends_at: Some(now + Duration::hours(5)),
            capacity: Some(50),
            image_url: None,
            organizer_id: "org".into(),
            group_id: None,
            status: ModerationStatus::Pending,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn pending_events_are_hidden_from_strangers() {
        let event = sample_event();
        assert!(!event.is_visible_to("stranger", Role::User));
        assert!(event.is_visible_to("org", Role::Organizer));
        assert!(event.is_visible_to("someone", Role::Admin));
    }

    #[test]
    fn update_only_touches_present_fields() {
        let mut event = sample_event();
        EventUpdate { title: Some("Semi Finals".into()), ..Default::default() }
            .apply_to(&mut event);
        assert_eq!(event.title, "Semi Finals");
        assert_eq!(event.location, "Riverside Hall");
        assert_eq!(event.capacity, Some(50));
    }

    #[test]
    fn null_clears_optional_fields_and_absent_keeps_them() {
        let mut event = sample_event();
        let update: EventUpdate =
            serde_json::from_str(r#"{"capacity": null, "image_url": null}"#).unwrap();
        assert_eq!(update.capacity, Some(None));
        assert_eq!(update.ends_at, None);

        let ends_at = event.ends_at;
        update.apply_to(&mut event);
        assert_eq!(event.capacity, None);
        assert_eq!(event.image_url, None);
        assert_eq!(event.ends_at, ends_at);
    }

    #[test]
    fn event_without_end_finishes_at_start() {
        let mut event = sample_event();
        event.ends_at = None;
        assert_eq!(event.effective_end(), event.starts_at);
        assert!(event.has_ended(event.starts_at + Duration::seconds(1)));
        assert!(!event.has_ended(event.starts_at));
    }
}
