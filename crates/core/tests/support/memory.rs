//! In-memory implementation of every core port.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_core::{
    ApplicationRepository, ConversationRepository, DashboardRepository, EventRepository,
    GroupRepository, LikeRepository, NotificationRepository, ReminderRepository,
    ReportRepository, RsvpOutcome, RsvpRepository, UserRepository,
};
use fanevent_domain::{
    AdminDashboard, AttendanceRecord, Attendee, Conversation, ConversationView, Event,
    EventReminder, FanEventError, Group, GroupMember, Message, ModerationStatus, Notification,
    OrganizerApplication, OrganizerEventStats, Report, ReportStatus, ReportTargetKind,
    Result as DomainResult, Role, Rsvp, UserProfile,
};

#[derive(Default)]
pub struct State {
    pub users: Vec<UserProfile>,
    pub events: Vec<Event>,
    pub groups: Vec<Group>,
    pub members: Vec<(String, String, DateTime<Utc>)>,
    pub rsvps: Vec<Rsvp>,
    pub likes: Vec<(String, String)>,
    pub applications: Vec<OrganizerApplication>,
    pub reports: Vec<Report>,
    pub conversations: Vec<Conversation>,
    pub unread: HashMap<(String, String), u32>,
    pub messages: Vec<Message>,
    pub notifications: Vec<Notification>,
    pub reminders: Vec<EventReminder>,
    /// Notification inserts for these users fail with a database error.
    pub failing_inboxes: Vec<String>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn missing(entity: &str, id: &str) -> FanEventError {
        FanEventError::not_found(entity, id)
    }
}

fn replace<T, F>(items: &mut [T], item: T, same: F) -> DomainResult<()>
where
    F: Fn(&T, &T) -> bool,
{
    match items.iter_mut().find(|existing| same(existing, &item)) {
        Some(slot) => {
            *slot = item;
            Ok(())
        }
        None => Err(FanEventError::NotFound("record not found".into())),
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get_by_id(&self, id: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.state().users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_by_subject(&self, subject: &str) -> DomainResult<Option<UserProfile>> {
        Ok(self.state().users.iter().find(|u| u.auth_subject == subject).cloned())
    }

    async fn create(&self, profile: UserProfile) -> DomainResult<()> {
        self.state().users.push(profile);
        Ok(())
    }

    async fn update(&self, profile: UserProfile) -> DomainResult<()> {
        replace(&mut self.state().users, profile, |a, b| a.id == b.id)
    }

    async fn list(&self, limit: u32, offset: u32) -> DomainResult<Vec<UserProfile>> {
        Ok(self.state().users.iter().skip(offset as usize).take(limit as usize).cloned().collect())
    }

    async fn list_all(&self) -> DomainResult<Vec<UserProfile>> {
        Ok(self.state().users.clone())
    }
}

#[async_trait]
impl EventRepository for MemoryStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Event>> {
        Ok(self.state().events.iter().find(|e| e.id == id).cloned())
    }

    async fn create(&self, event: Event) -> DomainResult<()> {
        self.state().events.push(event);
        Ok(())
    }

    async fn update(&self, event: Event) -> DomainResult<()> {
        replace(&mut self.state().events, event, |a, b| a.id == b.id)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.events.len();
        state.events.retain(|e| e.id != id);
        if state.events.len() == before {
            return Ok(false);
        }
        state.rsvps.retain(|r| r.event_id != id);
        state.likes.retain(|(event_id, _)| event_id != id);
        state.reminders.retain(|r| r.event_id != id);
        Ok(true)
    }

    async fn list_by_status(&self, status: ModerationStatus) -> DomainResult<Vec<Event>> {
        Ok(self.state().events.iter().filter(|e| e.status == status).cloned().collect())
    }

    async fn list_by_organizer(&self, organizer_id: &str) -> DomainResult<Vec<Event>> {
        Ok(self.state().events.iter().filter(|e| e.organizer_id == organizer_id).cloned().collect())
    }

    async fn list_by_group(&self, group_id: &str) -> DomainResult<Vec<Event>> {
        Ok(self
            .state()
            .events
            .iter()
            .filter(|e| e.group_id.as_deref() == Some(group_id))
            .cloned()
            .collect())
    }

    async fn list_approved_starting_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DomainResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .state()
            .events
            .iter()
            .filter(|e| e.status.is_approved() && e.starts_at > from && e.starts_at <= to)
            .cloned()
            .collect();
        events.sort_by_key(|e| e.starts_at);
        Ok(events)
    }

    async fn list_all(&self) -> DomainResult<Vec<Event>> {
        Ok(self.state().events.clone())
    }
}

#[async_trait]
impl GroupRepository for MemoryStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Group>> {
        Ok(self.state().groups.iter().find(|g| g.id == id).cloned())
    }

    async fn create(&self, group: Group) -> DomainResult<()> {
        self.state().groups.push(group);
        Ok(())
    }

    async fn update(&self, group: Group) -> DomainResult<()> {
        replace(&mut self.state().groups, group, |a, b| a.id == b.id)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.groups.len();
        state.groups.retain(|g| g.id != id);
        state.members.retain(|(group_id, _, _)| group_id != id);
        for event in state.events.iter_mut().filter(|e| e.group_id.as_deref() == Some(id)) {
            event.group_id = None;
        }
        Ok(state.groups.len() != before)
    }

    async fn list_by_status(&self, status: ModerationStatus) -> DomainResult<Vec<Group>> {
        Ok(self.state().groups.iter().filter(|g| g.status == status).cloned().collect())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Group>> {
        let state = self.state();
        let mut groups: Vec<Group> = state
            .groups
            .iter()
            .filter(|g| {
                g.owner_id == user_id
                    || state.members.iter().any(|(gid, uid, _)| gid == &g.id && uid == user_id)
            })
            .cloned()
            .collect();
        groups.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(groups)
    }

    async fn add_member(
        &self,
        group_id: &str,
        user_id: &str,
        joined_at: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let mut state = self.state();
        if state.members.iter().any(|(g, u, _)| g == group_id && u == user_id) {
            return Ok(false);
        }
        state.members.push((group_id.to_string(), user_id.to_string(), joined_at));
        Ok(true)
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.members.len();
        state.members.retain(|(g, u, _)| !(g == group_id && u == user_id));
        Ok(state.members.len() != before)
    }

    async fn is_member(&self, group_id: &str, user_id: &str) -> DomainResult<bool> {
        Ok(self.state().members.iter().any(|(g, u, _)| g == group_id && u == user_id))
    }

    async fn member_count(&self, group_id: &str) -> DomainResult<u32> {
        Ok(self.state().members.iter().filter(|(g, _, _)| g == group_id).count() as u32)
    }

    async fn members(&self, group_id: &str) -> DomainResult<Vec<GroupMember>> {
        let state = self.state();
        Ok(state
            .members
            .iter()
            .filter(|(g, _, _)| g == group_id)
            .map(|(g, u, joined_at)| GroupMember {
                group_id: g.clone(),
                user_id: u.clone(),
                display_name: state
                    .users
                    .iter()
                    .find(|p| &p.id == u)
                    .map(|p| p.public_name().to_string())
                    .unwrap_or_default(),
                joined_at: *joined_at,
            })
            .collect())
    }
}

#[async_trait]
impl RsvpRepository for MemoryStore {
    async fn get(&self, event_id: &str, user_id: &str) -> DomainResult<Option<Rsvp>> {
        Ok(self
            .state()
            .rsvps
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    async fn create(&self, rsvp: Rsvp, capacity: Option<u32>) -> DomainResult<RsvpOutcome> {
        let mut state = self.state();
        if state.rsvps.iter().any(|r| r.event_id == rsvp.event_id && r.user_id == rsvp.user_id) {
            return Ok(RsvpOutcome::AlreadyExists);
        }
        let taken = state.rsvps.iter().filter(|r| r.event_id == rsvp.event_id).count() as u32;
        if capacity.is_some_and(|cap| taken >= cap) {
            return Ok(RsvpOutcome::Full);
        }
        state.rsvps.push(rsvp);
        Ok(RsvpOutcome::Created)
    }

    async fn update(&self, rsvp: Rsvp) -> DomainResult<()> {
        replace(&mut self.state().rsvps, rsvp, |a, b| a.id == b.id)
    }

    async fn delete(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.rsvps.len();
        state.rsvps.retain(|r| !(r.event_id == event_id && r.user_id == user_id));
        Ok(state.rsvps.len() != before)
    }

    async fn count_for_event(&self, event_id: &str) -> DomainResult<u32> {
        Ok(self.state().rsvps.iter().filter(|r| r.event_id == event_id).count() as u32)
    }

    async fn count_checked_in(&self, event_id: &str) -> DomainResult<u32> {
        Ok(self
            .state()
            .rsvps
            .iter()
            .filter(|r| r.event_id == event_id && r.checked_in_at.is_some())
            .count() as u32)
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Rsvp>> {
        let mut rsvps: Vec<Rsvp> =
            self.state().rsvps.iter().filter(|r| r.user_id == user_id).cloned().collect();
        rsvps.reverse();
        Ok(rsvps)
    }

    async fn attendees(&self, event_id: &str) -> DomainResult<Vec<Attendee>> {
        let state = self.state();
        Ok(state
            .rsvps
            .iter()
            .filter(|r| r.event_id == event_id)
            .map(|r| {
                let profile = state.users.iter().find(|u| u.id == r.user_id);
                Attendee {
                    rsvp: r.clone(),
                    display_name: profile.map(|p| p.public_name().to_string()).unwrap_or_default(),
                    email: profile.map(|p| p.email.clone()).unwrap_or_default(),
                    hours: r.hours(),
                }
            })
            .collect())
    }

    async fn attendance_for_user(&self, user_id: &str) -> DomainResult<Vec<AttendanceRecord>> {
        let state = self.state();
        let mut records: Vec<AttendanceRecord> = state
            .rsvps
            .iter()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let checked_in_at = r.checked_in_at?;
                let event = state.events.iter().find(|e| e.id == r.event_id)?;
                Some(AttendanceRecord {
                    event_id: event.id.clone(),
                    event_title: event.title.clone(),
                    checked_in_at,
                    checked_out_at: r.checked_out_at,
                    hours: r.hours(),
                })
            })
            .collect();
        records.sort_by(|a, b| b.checked_in_at.cmp(&a.checked_in_at));
        Ok(records)
    }
}

#[async_trait]
impl LikeRepository for MemoryStore {
    async fn toggle(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.likes.len();
        state.likes.retain(|(e, u)| !(e == event_id && u == user_id));
        if state.likes.len() != before {
            return Ok(false);
        }
        state.likes.push((event_id.to_string(), user_id.to_string()));
        Ok(true)
    }

    async fn count(&self, event_id: &str) -> DomainResult<u32> {
        Ok(self.state().likes.iter().filter(|(e, _)| e == event_id).count() as u32)
    }

    async fn is_liked(&self, event_id: &str, user_id: &str) -> DomainResult<bool> {
        Ok(self.state().likes.iter().any(|(e, u)| e == event_id && u == user_id))
    }

    async fn liked_events(&self, user_id: &str) -> DomainResult<Vec<Event>> {
        let state = self.state();
        Ok(state
            .likes
            .iter()
            .rev()
            .filter(|(_, u)| u == user_id)
            .filter_map(|(e, _)| state.events.iter().find(|event| &event.id == e).cloned())
            .collect())
    }
}

#[async_trait]
impl ApplicationRepository for MemoryStore {
    async fn get(&self, id: &str) -> DomainResult<Option<OrganizerApplication>> {
        Ok(self.state().applications.iter().find(|a| a.id == id).cloned())
    }

    async fn create(&self, application: OrganizerApplication) -> DomainResult<()> {
        self.state().applications.push(application);
        Ok(())
    }

    async fn update(&self, application: OrganizerApplication) -> DomainResult<()> {
        replace(&mut self.state().applications, application, |a, b| a.id == b.id)
    }

    async fn find_pending_for_user(
        &self,
        user_id: &str,
    ) -> DomainResult<Option<OrganizerApplication>> {
        Ok(self
            .state()
            .applications
            .iter()
            .find(|a| a.user_id == user_id && a.status == ModerationStatus::Pending)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<OrganizerApplication>> {
        let state = self.state();
        Ok(state.applications.iter().rev().filter(|a| a.user_id == user_id).cloned().collect())
    }

    async fn list(
        &self,
        status: Option<ModerationStatus>,
    ) -> DomainResult<Vec<OrganizerApplication>> {
        Ok(self
            .state()
            .applications
            .iter()
            .rev()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ReportRepository for MemoryStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Report>> {
        Ok(self.state().reports.iter().find(|r| r.id == id).cloned())
    }

    async fn create(&self, report: Report) -> DomainResult<()> {
        self.state().reports.push(report);
        Ok(())
    }

    async fn update(&self, report: Report) -> DomainResult<()> {
        replace(&mut self.state().reports, report, |a, b| a.id == b.id)
    }

    async fn find_open(
        &self,
        reporter_id: &str,
        target_kind: ReportTargetKind,
        target_id: &str,
    ) -> DomainResult<Option<Report>> {
        Ok(self
            .state()
            .reports
            .iter()
            .find(|r| {
                r.reporter_id == reporter_id
                    && r.target_kind == target_kind
                    && r.target_id == target_id
                    && r.status == ReportStatus::Open
            })
            .cloned())
    }

    async fn list(&self, status: Option<ReportStatus>) -> DomainResult<Vec<Report>> {
        Ok(self
            .state()
            .reports
            .iter()
            .rev()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ConversationRepository for MemoryStore {
    async fn get(&self, id: &str) -> DomainResult<Option<Conversation>> {
        Ok(self.state().conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn find_direct(&self, a: &str, b: &str) -> DomainResult<Option<Conversation>> {
        Ok(self
            .state()
            .conversations
            .iter()
            .find(|c| c.participant_ids.len() == 2 && c.has_participant(a) && c.has_participant(b))
            .cloned())
    }

    async fn create(&self, conversation: Conversation) -> DomainResult<()> {
        let mut state = self.state();
        for participant in &conversation.participant_ids {
            state.unread.insert((conversation.id.clone(), participant.clone()), 0);
        }
        state.conversations.push(conversation);
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<ConversationView>> {
        let state = self.state();
        let mut views: Vec<ConversationView> = state
            .conversations
            .iter()
            .filter(|c| c.has_participant(user_id))
            .map(|c| ConversationView {
                conversation: c.clone(),
                unread_count: state
                    .unread
                    .get(&(c.id.clone(), user_id.to_string()))
                    .copied()
                    .unwrap_or(0),
            })
            .collect();
        views.sort_by(|a, b| {
            let key = |v: &ConversationView| {
                v.conversation.last_message_at.unwrap_or(v.conversation.created_at)
            };
            key(b).cmp(&key(a))
        });
        Ok(views)
    }

    async fn unread_count(&self, conversation_id: &str, user_id: &str) -> DomainResult<u32> {
        Ok(self
            .state()
            .unread
            .get(&(conversation_id.to_string(), user_id.to_string()))
            .copied()
            .unwrap_or(0))
    }

    async fn append_message(&self, message: Message, preview: String) -> DomainResult<()> {
        let mut state = self.state();
        let conversation = state
            .conversations
            .iter_mut()
            .find(|c| c.id == message.conversation_id)
            .ok_or_else(|| Self::missing("conversation", &message.conversation_id))?;
        conversation.last_message_preview = Some(preview);
        conversation.last_message_at = Some(message.created_at);
        let recipients: Vec<String> =
            conversation.others(&message.sender_id).cloned().collect();
        for recipient in recipients {
            *state.unread.entry((message.conversation_id.clone(), recipient)).or_insert(0) += 1;
        }
        state.messages.push(message);
        Ok(())
    }

    async fn messages(
        &self,
        conversation_id: &str,
        limit: u32,
        before: Option<&str>,
    ) -> DomainResult<Vec<Message>> {
        let state = self.state();
        let in_conversation: Vec<&Message> =
            state.messages.iter().filter(|m| m.conversation_id == conversation_id).collect();
        let end = match before {
            Some(id) => in_conversation
                .iter()
                .position(|m| m.id == id)
                .ok_or_else(|| Self::missing("message", id))?,
            None => in_conversation.len(),
        };
        let start = end.saturating_sub(limit as usize);
        Ok(in_conversation[start..end].iter().map(|m| (*m).clone()).collect())
    }

    async fn get_message(&self, id: &str) -> DomainResult<Option<Message>> {
        Ok(self.state().messages.iter().find(|m| m.id == id).cloned())
    }

    async fn mark_read(&self, conversation_id: &str, user_id: &str) -> DomainResult<()> {
        self.state().unread.insert((conversation_id.to_string(), user_id.to_string()), 0);
        Ok(())
    }

    async fn unread_total(&self, user_id: &str) -> DomainResult<u32> {
        Ok(self
            .state()
            .unread
            .iter()
            .filter(|((_, u), _)| u == user_id)
            .map(|(_, count)| *count)
            .sum())
    }
}

#[async_trait]
impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: Notification) -> DomainResult<bool> {
        let mut state = self.state();
        if state.failing_inboxes.contains(&notification.user_id) {
            return Err(FanEventError::Database("disk I/O error".into()));
        }
        if let Some(key) = notification.dedup_key.as_deref() {
            let duplicate = state.notifications.iter().any(|n| {
                n.user_id == notification.user_id && n.dedup_key.as_deref() == Some(key)
            });
            if duplicate {
                return Ok(false);
            }
        }
        state.notifications.push(notification);
        Ok(true)
    }

    async fn get(&self, id: &str) -> DomainResult<Option<Notification>> {
        Ok(self.state().notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list(
        &self,
        user_id: &str,
        unread_only: bool,
        limit: u32,
    ) -> DomainResult<Vec<Notification>> {
        Ok(self
            .state()
            .notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.read))
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn unread_count(&self, user_id: &str) -> DomainResult<u32> {
        Ok(self.state().notifications.iter().filter(|n| n.user_id == user_id && !n.read).count()
            as u32)
    }

    async fn mark_read(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        match state.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) => {
                n.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: &str) -> DomainResult<u32> {
        let mut state = self.state();
        let mut changed = 0;
        for n in state.notifications.iter_mut().filter(|n| n.user_id == user_id && !n.read) {
            n.read = true;
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.notifications.len();
        state.notifications.retain(|n| n.id != id);
        Ok(state.notifications.len() != before)
    }
}

#[async_trait]
impl ReminderRepository for MemoryStore {
    async fn replace_for_event(
        &self,
        user_id: &str,
        event_id: &str,
        reminders: Vec<EventReminder>,
    ) -> DomainResult<()> {
        let mut state = self.state();
        state.reminders.retain(|r| !(r.user_id == user_id && r.event_id == event_id));
        state.reminders.extend(reminders);
        Ok(())
    }

    async fn get(&self, id: &str) -> DomainResult<Option<EventReminder>> {
        Ok(self.state().reminders.iter().find(|r| r.id == id).cloned())
    }

    async fn delete(&self, id: &str) -> DomainResult<bool> {
        let mut state = self.state();
        let before = state.reminders.len();
        state.reminders.retain(|r| r.id != id);
        Ok(state.reminders.len() != before)
    }

    async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<EventReminder>> {
        let mut reminders: Vec<EventReminder> =
            self.state().reminders.iter().filter(|r| r.user_id == user_id).cloned().collect();
        reminders.sort_by(|a, b| {
            a.event_id.cmp(&b.event_id).then(a.offset_minutes.cmp(&b.offset_minutes))
        });
        Ok(reminders)
    }

    async fn list_for_event(&self, event_id: &str) -> DomainResult<Vec<EventReminder>> {
        Ok(self.state().reminders.iter().filter(|r| r.event_id == event_id).cloned().collect())
    }
}

#[async_trait]
impl DashboardRepository for MemoryStore {
    async fn admin_dashboard(&self, now: DateTime<Utc>) -> DomainResult<AdminDashboard> {
        let state = self.state();
        let mut dashboard = AdminDashboard::default();

        for user in &state.users {
            match user.role {
                Role::User => dashboard.users.users += 1,
                Role::Organizer => dashboard.users.organizers += 1,
                Role::Admin => dashboard.users.admins += 1,
            }
        }
        for event in &state.events {
            match event.status {
                ModerationStatus::Pending => dashboard.events.pending += 1,
                ModerationStatus::Approved => dashboard.events.approved += 1,
                ModerationStatus::Rejected => dashboard.events.rejected += 1,
            }
            if event.status.is_approved() && event.starts_at > now {
                dashboard.upcoming_events += 1;
            }
        }
        for group in &state.groups {
            match group.status {
                ModerationStatus::Pending => dashboard.groups.pending += 1,
                ModerationStatus::Approved => dashboard.groups.approved += 1,
                ModerationStatus::Rejected => dashboard.groups.rejected += 1,
            }
        }
        dashboard.pending_applications = state
            .applications
            .iter()
            .filter(|a| a.status == ModerationStatus::Pending)
            .count() as u32;
        dashboard.open_reports =
            state.reports.iter().filter(|r| r.status == ReportStatus::Open).count() as u32;
        dashboard.total_rsvps = state.rsvps.len() as u32;
        Ok(dashboard)
    }

    async fn organizer_event_stats(
        &self,
        organizer_id: &str,
    ) -> DomainResult<Vec<OrganizerEventStats>> {
        let state = self.state();
        let mut stats: Vec<OrganizerEventStats> = state
            .events
            .iter()
            .filter(|e| e.organizer_id == organizer_id)
            .map(|e| {
                let rsvps: Vec<&Rsvp> = state.rsvps.iter().filter(|r| r.event_id == e.id).collect();
                OrganizerEventStats {
                    event_id: e.id.clone(),
                    title: e.title.clone(),
                    status: e.status,
                    starts_at: e.starts_at,
                    rsvp_count: rsvps.len() as u32,
                    checked_in_count: rsvps.iter().filter(|r| r.checked_in_at.is_some()).count()
                        as u32,
                    like_count: state.likes.iter().filter(|(id, _)| id == &e.id).count() as u32,
                    attendance_hours: rsvps.iter().filter_map(|r| r.hours()).sum(),
                }
            })
            .collect();
        stats.sort_by_key(|s| s.starts_at);
        Ok(stats)
    }
}
