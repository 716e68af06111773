//! Shared test helpers for `fanevent-core` integration tests.
//!
//! [`MemoryStore`] implements every port over plain vectors so services can
//! be exercised end to end without a database. [`Harness`] wires all
//! services to one store.

#![allow(dead_code)]

pub mod memory;

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use fanevent_core::{
    Actor, DashboardService, EventService, ExportService, GroupService, LikeService,
    MessagingService, ModerationService, NotificationService, OrganizerApplicationService,
    ReminderService, ReportService, ReportTargets, RsvpService, UserService,
};
use fanevent_domain::{new_id, Event, Group, ModerationStatus, Role, UserProfile};
pub use memory::MemoryStore;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub users: UserService,
    pub events: EventService,
    pub groups: GroupService,
    pub rsvps: RsvpService,
    pub likes: LikeService,
    pub moderation: ModerationService,
    pub applications: OrganizerApplicationService,
    pub reports: ReportService,
    pub messaging: MessagingService,
    pub notifications: NotificationService,
    pub reminders: ReminderService,
    pub dashboard: DashboardService,
    pub exports: ExportService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        Self {
            users: UserService::new(store.clone()),
            events: EventService::new(store.clone(), store.clone(), store.clone(), store.clone()),
            groups: GroupService::new(store.clone(), store.clone()),
            rsvps: RsvpService::new(store.clone(), store.clone()),
            likes: LikeService::new(store.clone(), store.clone()),
            moderation: ModerationService::new(store.clone(), store.clone(), store.clone()),
            applications: OrganizerApplicationService::new(
                store.clone(),
                store.clone(),
                store.clone(),
            ),
            reports: ReportService::new(
                store.clone(),
                ReportTargets {
                    events: store.clone(),
                    groups: store.clone(),
                    users: store.clone(),
                    conversations: store.clone(),
                },
                store.clone(),
            ),
            messaging: MessagingService::new(store.clone(), store.clone(), store.clone()),
            notifications: NotificationService::new(store.clone()),
            reminders: ReminderService::new(store.clone(), store.clone(), store.clone(), 60),
            dashboard: DashboardService::new(store.clone()),
            exports: ExportService::new(store.clone(), store.clone(), store.clone()),
            store,
        }
    }

    /// Insert a profile directly and return the matching caller.
    pub fn seed_user(&self, name: &str, role: Role) -> Actor {
        let now = Utc::now();
        let profile = UserProfile {
            id: new_id(),
            auth_subject: format!("auth|{name}"),
            email: format!("{name}@example.com"),
            display_name: Some(name.to_string()),
            avatar_url: None,
            bio: None,
            role,
            created_at: now,
            updated_at: now,
        };
        let actor = Actor::new(profile.id.clone(), role);
        self.store.state().users.push(profile);
        actor
    }

    /// Insert an event directly, bypassing validation and moderation.
    pub fn seed_event(
        &self,
        organizer: &Actor,
        title: &str,
        starts_at: DateTime<Utc>,
        status: ModerationStatus,
    ) -> Event {
        let now = Utc::now();
        let event = Event {
            id: new_id(),
            title: title.to_string(),
            description: String::new(),
            location: "Main Hall".to_string(),
            category: "Meetup".to_string(),
            starts_at,
            ends_at: Some(starts_at + Duration::hours(2)),
            capacity: None,
            image_url: None,
            organizer_id: organizer.user_id.clone(),
            group_id: None,
            status,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        };
        self.store.state().events.push(event.clone());
        event
    }

    pub fn seed_group(&self, owner: &Actor, name: &str, status: ModerationStatus) -> Group {
        let now = Utc::now();
        let group = Group {
            id: new_id(),
            name: name.to_string(),
            description: String::new(),
            category: "Anime".to_string(),
            image_url: None,
            owner_id: owner.user_id.clone(),
            status,
            moderation_note: None,
            created_at: now,
            updated_at: now,
        };
        let mut state = self.store.state();
        state.groups.push(group.clone());
        state.members.push((group.id.clone(), owner.user_id.clone(), now));
        group
    }
}
