//! End-to-end database integration coverage for the SQLite repositories.
//!
//! Each test runs against an isolated file database with the real schema
//! applied, so constraint behaviour (uniqueness, cascades, capacity) is the
//! one production sees.

use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use fanevent_core::{
    ApplicationRepository, ConversationRepository, DashboardRepository, EventRepository,
    GroupRepository, LikeRepository, NotificationRepository, ReminderRepository,
    ReportRepository, RsvpOutcome, RsvpRepository, UserRepository,
};
use fanevent_domain::{
    new_id, Conversation, Event, EventReminder, FanEventError, Group, Message, ModerationStatus,
    Notification, NotificationKind, OrganizerApplication, Report, ReportStatus,
    ReportTargetKind, Role, Rsvp, UserProfile,
};
use fanevent_infra::database::{
    DbManager, SqliteApplicationRepository, SqliteConversationRepository,
    SqliteDashboardRepository, SqliteEventRepository, SqliteGroupRepository,
    SqliteLikeRepository, SqliteNotificationRepository, SqliteReminderRepository,
    SqliteReportRepository, SqliteRsvpRepository, SqliteUserRepository,
};
use tempfile::TempDir;

struct DbHarness {
    #[allow(dead_code)]
    temp_dir: TempDir,
    manager: Arc<DbManager>,
}

impl DbHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("temporary directory should be created");
        let db_path = temp_dir.path().join("fanevent-integration.db");

        let manager =
            Arc::new(DbManager::new(&db_path, 4).expect("database manager should initialise"));
        manager.run_migrations().expect("schema migrations should apply");

        Self { temp_dir, manager }
    }

    fn users(&self) -> SqliteUserRepository {
        SqliteUserRepository::new(Arc::clone(&self.manager))
    }

    fn events(&self) -> SqliteEventRepository {
        SqliteEventRepository::new(Arc::clone(&self.manager))
    }

    fn groups(&self) -> SqliteGroupRepository {
        SqliteGroupRepository::new(Arc::clone(&self.manager))
    }

    fn rsvps(&self) -> SqliteRsvpRepository {
        SqliteRsvpRepository::new(Arc::clone(&self.manager))
    }

    async fn seed_user(&self, id: &str, role: Role) -> UserProfile {
        let user = make_user(id, role);
        self.users().create(user.clone()).await.expect("user should persist");
        user
    }

    async fn seed_event(&self, organizer: &str, status: ModerationStatus, hours: i64) -> Event {
        let event = make_event(organizer, status, base() + Duration::hours(hours));
        self.events().create(event.clone()).await.expect("event should persist");
        event
    }
}

fn base() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 1, 12, 0, 0).single().expect("base timestamp should be valid")
}

fn make_user(id: &str, role: Role) -> UserProfile {
    UserProfile {
        id: id.into(),
        auth_subject: format!("auth|{id}"),
        email: format!("{id}@example.com"),
        display_name: Some(format!("Fan {id}")),
        avatar_url: None,
        bio: None,
        role,
        created_at: base(),
        updated_at: base(),
    }
}

fn make_event(organizer: &str, status: ModerationStatus, starts_at: DateTime<Utc>) -> Event {
    Event {
        id: new_id(),
        title: "Derby watch party".into(),
        description: "Big screen, loud crowd".into(),
        location: "The Anchor, Leeds".into(),
        category: "football".into(),
        starts_at,
        ends_at: Some(starts_at + Duration::hours(2)),
        capacity: None,
        image_url: None,
        organizer_id: organizer.into(),
        group_id: None,
        status,
        moderation_note: None,
        created_at: base(),
        updated_at: base(),
    }
}

fn make_group(owner: &str, status: ModerationStatus) -> Group {
    Group {
        id: new_id(),
        name: "Leeds Supporters".into(),
        description: "Away days and pints".into(),
        category: "football".into(),
        image_url: None,
        owner_id: owner.into(),
        status,
        moderation_note: None,
        created_at: base(),
        updated_at: base(),
    }
}

fn make_rsvp(event_id: &str, user_id: &str) -> Rsvp {
    Rsvp {
        id: new_id(),
        event_id: event_id.into(),
        user_id: user_id.into(),
        created_at: base(),
        checked_in_at: None,
        checked_out_at: None,
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn event_update_and_listing_workflow() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    let events = harness.events();

    let later = harness.seed_event("org", ModerationStatus::Approved, 48).await;
    let sooner = harness.seed_event("org", ModerationStatus::Approved, 2).await;
    let mut pending = harness.seed_event("org", ModerationStatus::Pending, 5).await;

    let approved = events.list_by_status(ModerationStatus::Approved).await.unwrap();
    let ids: Vec<_> = approved.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec![sooner.id.as_str(), later.id.as_str()]);

    pending.capacity = Some(30);
    pending.status = ModerationStatus::Rejected;
    pending.moderation_note = Some("Duplicate listing".into());
    events.update(pending.clone()).await.expect("update should persist");
    assert_eq!(events.get(&pending.id).await.unwrap(), Some(pending.clone()));

    let window = events
        .list_approved_starting_between(base(), base() + Duration::hours(24))
        .await
        .unwrap();
    assert_eq!(window.len(), 1);
    assert_eq!(window[0].id, sooner.id);

    assert_eq!(events.list_by_organizer("org").await.unwrap().len(), 3);
    assert_eq!(events.list_all().await.unwrap().len(), 3);

    let missing = make_event("org", ModerationStatus::Pending, base());
    let err = events.update(missing).await.unwrap_err();
    assert!(matches!(err, FanEventError::NotFound(_)), "unexpected: {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn event_with_unknown_organizer_is_rejected() {
    let harness = DbHarness::new();
    let event = make_event("ghost", ModerationStatus::Pending, base());

    let err = harness.events().create(event).await.unwrap_err();
    assert!(matches!(err, FanEventError::InvalidInput(_)), "unexpected: {err:?}");
}

#[tokio::test(flavor = "multi_thread")]
async fn rsvp_capacity_and_duplicates() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    for id in ["a", "b", "c"] {
        harness.seed_user(id, Role::User).await;
    }
    let event = harness.seed_event("org", ModerationStatus::Approved, 24).await;
    let rsvps = harness.rsvps();

    let first = rsvps.create(make_rsvp(&event.id, "a"), Some(2)).await.unwrap();
    let again = rsvps.create(make_rsvp(&event.id, "a"), Some(2)).await.unwrap();
    let second = rsvps.create(make_rsvp(&event.id, "b"), Some(2)).await.unwrap();
    let third = rsvps.create(make_rsvp(&event.id, "c"), Some(2)).await.unwrap();

    assert_eq!(first, RsvpOutcome::Created);
    assert_eq!(again, RsvpOutcome::AlreadyExists);
    assert_eq!(second, RsvpOutcome::Created);
    assert_eq!(third, RsvpOutcome::Full);
    assert_eq!(rsvps.count_for_event(&event.id).await.unwrap(), 2);

    assert!(rsvps.delete(&event.id, "a").await.unwrap());
    assert!(!rsvps.delete(&event.id, "a").await.unwrap());
    let retry = rsvps.create(make_rsvp(&event.id, "c"), Some(2)).await.unwrap();
    assert_eq!(retry, RsvpOutcome::Created);
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_rsvps_never_exceed_capacity() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    let event = harness.seed_event("org", ModerationStatus::Approved, 24).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let user = format!("fan{i}");
        harness.seed_user(&user, Role::User).await;
        let repo = harness.rsvps();
        let event_id = event.id.clone();
        handles.push(tokio::spawn(async move {
            repo.create(make_rsvp(&event_id, &user), Some(3)).await
        }));
    }

    let mut created = 0;
    for handle in handles {
        if handle.await.expect("task should join").expect("rsvp should not error")
            == RsvpOutcome::Created
        {
            created += 1;
        }
    }

    assert_eq!(created, 3);
    assert_eq!(harness.rsvps().count_for_event(&event.id).await.unwrap(), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn attendance_records_and_attendees() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    let event = harness.seed_event("org", ModerationStatus::Approved, 1).await;
    let rsvps = harness.rsvps();

    let mut rsvp = make_rsvp(&event.id, "fan");
    rsvps.create(rsvp.clone(), None).await.unwrap();

    rsvp.checked_in_at = Some(event.starts_at);
    rsvp.checked_out_at = Some(event.starts_at + Duration::minutes(90));
    rsvps.update(rsvp.clone()).await.expect("check-in should persist");

    assert_eq!(rsvps.count_checked_in(&event.id).await.unwrap(), 1);

    let attendees = rsvps.attendees(&event.id).await.unwrap();
    assert_eq!(attendees.len(), 1);
    assert_eq!(attendees[0].display_name, "Fan fan");
    assert_eq!(attendees[0].hours, Some(1.5));

    let history = rsvps.attendance_for_user("fan").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event_title, event.title);
    assert_eq!(history[0].hours, Some(1.5));

    let stats = SqliteDashboardRepository::new(Arc::clone(&harness.manager))
        .organizer_event_stats("org")
        .await
        .unwrap();
    assert_eq!(stats.len(), 1);
    assert_eq!(stats[0].rsvp_count, 1);
    assert_eq!(stats[0].checked_in_count, 1);
    assert!((stats[0].attendance_hours - 1.5).abs() < f64::EPSILON);
}

#[tokio::test(flavor = "multi_thread")]
async fn deleting_event_cascades_dependents() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    let event = harness.seed_event("org", ModerationStatus::Approved, 24).await;

    let likes = SqliteLikeRepository::new(Arc::clone(&harness.manager));
    let reminders = SqliteReminderRepository::new(Arc::clone(&harness.manager));
    let notifications = SqliteNotificationRepository::new(Arc::clone(&harness.manager));

    harness.rsvps().create(make_rsvp(&event.id, "fan"), None).await.unwrap();
    assert!(likes.toggle(&event.id, "fan").await.unwrap());
    reminders
        .replace_for_event(
            "fan",
            &event.id,
            vec![EventReminder {
                id: new_id(),
                user_id: "fan".into(),
                event_id: event.id.clone(),
                offset_minutes: 60,
                created_at: base(),
            }],
        )
        .await
        .unwrap();
    let notification =
        Notification::new("fan", NotificationKind::EventApproved, "Approved", "See you there")
            .with_event(&event.id);
    notifications.create(notification.clone()).await.unwrap();

    assert!(harness.events().delete(&event.id).await.unwrap());

    assert!(harness.rsvps().get(&event.id, "fan").await.unwrap().is_none());
    assert_eq!(likes.count(&event.id).await.unwrap(), 0);
    assert!(reminders.list_for_user("fan").await.unwrap().is_empty());
    let kept = notifications.get(&notification.id).await.unwrap().expect("notification kept");
    assert_eq!(kept.event_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn group_membership_and_deletion() {
    let harness = DbHarness::new();
    harness.seed_user("owner", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    let groups = harness.groups();

    let group = make_group("owner", ModerationStatus::Approved);
    groups.create(group.clone()).await.unwrap();

    assert!(groups.add_member(&group.id, "fan", base()).await.unwrap());
    assert!(!groups.add_member(&group.id, "fan", base()).await.unwrap());
    assert!(groups.is_member(&group.id, "fan").await.unwrap());
    assert_eq!(groups.member_count(&group.id).await.unwrap(), 1);

    let members = groups.members(&group.id).await.unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0].display_name, "Fan fan");

    assert_eq!(groups.list_for_user("fan").await.unwrap().len(), 1);
    assert_eq!(groups.list_for_user("owner").await.unwrap().len(), 1);

    let mut event = make_event("owner", ModerationStatus::Approved, base());
    event.group_id = Some(group.id.clone());
    harness.events().create(event.clone()).await.unwrap();
    assert_eq!(harness.events().list_by_group(&group.id).await.unwrap().len(), 1);

    assert!(groups.delete(&group.id).await.unwrap());
    assert!(!groups.is_member(&group.id, "fan").await.unwrap());
    let orphan = harness.events().get(&event.id).await.unwrap().expect("event survives");
    assert_eq!(orphan.group_id, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn like_toggle_round_trip() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    let event = harness.seed_event("org", ModerationStatus::Approved, 24).await;
    let likes = SqliteLikeRepository::new(Arc::clone(&harness.manager));

    assert!(likes.toggle(&event.id, "fan").await.unwrap());
    assert!(likes.is_liked(&event.id, "fan").await.unwrap());
    assert_eq!(likes.liked_events("fan").await.unwrap().len(), 1);

    assert!(!likes.toggle(&event.id, "fan").await.unwrap());
    assert!(!likes.is_liked(&event.id, "fan").await.unwrap());
    assert_eq!(likes.count(&event.id).await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn notifications_deduplicate_and_mark_read() {
    let harness = DbHarness::new();
    harness.seed_user("fan", Role::User).await;
    let notifications = SqliteNotificationRepository::new(Arc::clone(&harness.manager));

    let reminder = Notification::new("fan", NotificationKind::EventReminder, "Soon", "1h")
        .with_dedup_key("reminder:e1:60")
        .created_at(base());
    let duplicate = Notification::new("fan", NotificationKind::EventReminder, "Soon", "1h")
        .with_dedup_key("reminder:e1:60")
        .created_at(base());
    let plain = Notification::new("fan", NotificationKind::NewMessage, "Hi", "hello")
        .created_at(base() + Duration::minutes(1));

    assert!(notifications.create(reminder.clone()).await.unwrap());
    assert!(!notifications.create(duplicate).await.unwrap());
    assert!(notifications.create(plain.clone()).await.unwrap());

    let listed = notifications.list("fan", false, 10).await.unwrap();
    let listed_ids: Vec<&str> = listed.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(listed_ids, vec![plain.id.as_str(), reminder.id.as_str()]);
    assert_eq!(notifications.unread_count("fan").await.unwrap(), 2);

    assert!(notifications.mark_read(&plain.id).await.unwrap());
    assert_eq!(notifications.list("fan", true, 10).await.unwrap().len(), 1);
    assert_eq!(notifications.mark_all_read("fan").await.unwrap(), 1);
    assert_eq!(notifications.unread_count("fan").await.unwrap(), 0);

    assert!(notifications.delete(&reminder.id).await.unwrap());
    assert!(notifications.get(&reminder.id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_messages_page_backwards() {
    let harness = DbHarness::new();
    harness.seed_user("a", Role::User).await;
    harness.seed_user("b", Role::User).await;
    let conversations = SqliteConversationRepository::new(Arc::clone(&harness.manager));

    let conversation = Conversation {
        id: new_id(),
        participant_ids: vec!["a".into(), "b".into()],
        last_message_preview: None,
        last_message_at: None,
        created_at: base(),
    };
    conversations.create(conversation.clone()).await.unwrap();

    let found = conversations.find_direct("b", "a").await.unwrap().expect("direct found");
    assert_eq!(found.participant_ids, vec!["a".to_string(), "b".to_string()]);

    let mut ids = Vec::new();
    for i in 0..5 {
        let message = Message {
            id: new_id(),
            conversation_id: conversation.id.clone(),
            sender_id: "a".into(),
            body: format!("message {i}"),
            created_at: base() + Duration::seconds(i),
        };
        ids.push(message.id.clone());
        conversations.append_message(message, format!("message {i}")).await.unwrap();
    }

    assert_eq!(conversations.unread_count(&conversation.id, "b").await.unwrap(), 5);
    assert_eq!(conversations.unread_count(&conversation.id, "a").await.unwrap(), 0);
    assert_eq!(conversations.unread_total("b").await.unwrap(), 5);

    let latest = conversations.messages(&conversation.id, 2, None).await.unwrap();
    assert_eq!(latest.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), ids[3..].to_vec());

    let older = conversations.messages(&conversation.id, 2, Some(&ids[3])).await.unwrap();
    assert_eq!(older.iter().map(|m| m.id.clone()).collect::<Vec<_>>(), ids[1..3].to_vec());

    let err = conversations.messages(&conversation.id, 2, Some("no-such-message")).await;
    assert!(matches!(err, Err(FanEventError::NotFound(_))));

    let views = conversations.list_for_user("b").await.unwrap();
    assert_eq!(views.len(), 1);
    assert_eq!(views[0].unread_count, 5);
    assert_eq!(views[0].conversation.last_message_preview.as_deref(), Some("message 4"));

    conversations.mark_read(&conversation.id, "b").await.unwrap();
    assert_eq!(conversations.unread_total("b").await.unwrap(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn reminders_replace_per_event() {
    let harness = DbHarness::new();
    harness.seed_user("org", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    let event = harness.seed_event("org", ModerationStatus::Approved, 24).await;
    let reminders = SqliteReminderRepository::new(Arc::clone(&harness.manager));

    let reminder = |offset: i64| EventReminder {
        id: new_id(),
        user_id: "fan".into(),
        event_id: event.id.clone(),
        offset_minutes: offset,
        created_at: base(),
    };

    reminders
        .replace_for_event("fan", &event.id, vec![reminder(60), reminder(1440)])
        .await
        .unwrap();
    reminders.replace_for_event("fan", &event.id, vec![reminder(15)]).await.unwrap();

    let stored = reminders.list_for_event(&event.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].offset_minutes, 15);

    assert!(reminders.delete(&stored[0].id).await.unwrap());
    assert!(reminders.get(&stored[0].id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn moderation_queues_and_admin_dashboard() {
    let harness = DbHarness::new();
    harness.seed_user("admin", Role::Admin).await;
    harness.seed_user("org", Role::Organizer).await;
    harness.seed_user("fan", Role::User).await;
    harness.seed_event("org", ModerationStatus::Approved, 24).await;
    harness.seed_event("org", ModerationStatus::Approved, -24).await;
    harness.seed_event("org", ModerationStatus::Pending, 24).await;
    harness.groups().create(make_group("org", ModerationStatus::Rejected)).await.unwrap();

    let applications = SqliteApplicationRepository::new(Arc::clone(&harness.manager));
    let mut application = OrganizerApplication {
        id: new_id(),
        user_id: "fan".into(),
        organization_name: Some("Leeds Ultras".into()),
        motivation: "We run monthly away-day trips for members.".into(),
        experience: None,
        status: ModerationStatus::Pending,
        reviewer_id: None,
        review_note: None,
        created_at: base(),
        reviewed_at: None,
    };
    applications.create(application.clone()).await.unwrap();
    assert!(applications.find_pending_for_user("fan").await.unwrap().is_some());

    let reports = SqliteReportRepository::new(Arc::clone(&harness.manager));
    let report = Report {
        id: new_id(),
        reporter_id: "fan".into(),
        target_kind: ReportTargetKind::User,
        target_id: "org".into(),
        reason: "Spam invites".into(),
        status: ReportStatus::Open,
        resolver_id: None,
        resolution_note: None,
        created_at: base(),
        resolved_at: None,
    };
    reports.create(report.clone()).await.unwrap();
    assert!(reports.find_open("fan", ReportTargetKind::User, "org").await.unwrap().is_some());

    let dashboard = SqliteDashboardRepository::new(Arc::clone(&harness.manager));
    let stats = dashboard.admin_dashboard(base()).await.unwrap();
    assert_eq!((stats.users.users, stats.users.organizers, stats.users.admins), (1, 1, 1));
    assert_eq!((stats.events.approved, stats.events.pending), (2, 1));
    assert_eq!(stats.groups.rejected, 1);
    assert_eq!(stats.pending_applications, 1);
    assert_eq!(stats.open_reports, 1);
    assert_eq!(stats.upcoming_events, 1);

    application.status = ModerationStatus::Approved;
    application.reviewer_id = Some("admin".into());
    application.reviewed_at = Some(base());
    applications.update(application).await.unwrap();
    assert!(applications.find_pending_for_user("fan").await.unwrap().is_none());
    assert_eq!(applications.list(Some(ModerationStatus::Approved)).await.unwrap().len(), 1);

    let stats = dashboard.admin_dashboard(base()).await.unwrap();
    assert_eq!(stats.pending_applications, 0);
}
