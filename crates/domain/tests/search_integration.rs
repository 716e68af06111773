//! Integration tests for event/group search filters.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fanevent_domain::{
    DateBucket, Event, EventFilter, Group, GroupFilter, ModerationStatus,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap()
}

fn event(id: &str, title: &str, category: &str, starts_in_hours: i64) -> Event {
    let created = now() - Duration::days(10);
    Event {
        id: id.into(),
        title: title.into(),
        description: format!("{title} description"),
        location: "Main Arena".into(),
        category: category.into(),
        starts_at: now() + Duration::hours(starts_in_hours),
        ends_at: None,
        capacity: None,
        image_url: None,
        organizer_id: "org".into(),
        group_id: None,
        status: ModerationStatus::Approved,
        moderation_note: None,
        created_at: created,
        updated_at: created,
    }
}

fn group(id: &str, name: &str, category: &str) -> Group {
    Group {
        id: id.into(),
        name: name.into(),
        description: String::new(),
        category: category.into(),
        image_url: None,
        owner_id: "org".into(),
        status: ModerationStatus::Approved,
        moderation_note: None,
        created_at: now(),
        updated_at: now(),
    }
}

fn sample_events() -> Vec<Event> {
    vec![
        event("late", "Anime Marathon", "Anime", 48),
        event("soon", "Cosplay Meetup", "Anime", 2),
        event("past", "Retro Game Night", "Gaming", -30),
        event("older", "Speedrun Showcase", "Gaming", -200),
    ]
}

#[test]
fn text_query_is_case_insensitive_and_searches_all_fields() {
    let filter = EventFilter { q: Some("  COSPLAY ".into()), ..Default::default() };
    let ids: Vec<_> =
        filter.apply(sample_events(), now()).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["soon"]);

    let by_location = EventFilter { q: Some("arena".into()), ..Default::default() };
    assert_eq!(by_location.apply(sample_events(), now()).len(), 4);
}

#[test]
fn upcoming_sorted_ascending_past_sorted_descending() {
    let upcoming = EventFilter { when: Some(DateBucket::Upcoming), ..Default::default() };
    let ids: Vec<_> =
        upcoming.apply(sample_events(), now()).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["soon", "late"]);

    let past = EventFilter { when: Some(DateBucket::Past), ..Default::default() };
    let ids: Vec<_> = past.apply(sample_events(), now()).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["past", "older"]);
}

#[test]
fn category_and_pagination_combine() {
    let filter = EventFilter {
        category: Some("gaming".into()),
        limit: Some(1),
        offset: Some(1),
        ..Default::default()
    };
    let ids: Vec<_> = filter.apply(sample_events(), now()).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["past"]);
}

#[test]
fn group_filter_sorts_by_name() {
    let groups = vec![
        group("b", "zelda fans", "Gaming"),
        group("a", "Anime Club", "Anime"),
        group("c", "Metroid Circle", "Gaming"),
    ];
    let filter = GroupFilter { category: Some("Gaming".into()), ..Default::default() };
    let names: Vec<_> = filter.apply(groups).into_iter().map(|g| g.name).collect();
    assert_eq!(names, vec!["Metroid Circle", "zelda fans"]);
}
