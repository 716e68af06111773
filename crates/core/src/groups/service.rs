//! Group service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{StringValidator, UrlValidator, ValidationError};
use fanevent_domain::constants::{
    CATEGORY_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, GROUP_NAME_MAX_LENGTH, GROUP_NAME_MIN_LENGTH,
};
use fanevent_domain::{
    new_id, Event, FanEventError, Group, GroupFilter, GroupMember, GroupSummary, GroupUpdate,
    ModerationStatus, NewGroup, Result,
};
use tracing::info;

use super::ports::GroupRepository;
use crate::access::Actor;
use crate::events::ports::EventRepository;
use crate::validation::{clean_optional, ensure_valid};

pub struct GroupService {
    groups: Arc<dyn GroupRepository>,
    events: Arc<dyn EventRepository>,
}

impl GroupService {
    pub fn new(groups: Arc<dyn GroupRepository>, events: Arc<dyn EventRepository>) -> Self {
        Self { groups, events }
    }

    /// Create a group owned by the caller, who also becomes its first member
    pub async fn create(&self, actor: &Actor, new_group: NewGroup) -> Result<Group> {
        actor.require_organizer()?;

        let now = Utc::now();
        let group = Group {
            id: new_id(),
            name: new_group.name.trim().to_string(),
            description: new_group.description.trim().to_string(),
            category: new_group.category.trim().to_string(),
            image_url: clean_optional(new_group.image_url),
            owner_id: actor.user_id.clone(),
            status: if actor.is_admin() {
                ModerationStatus::Approved
            } else {
                ModerationStatus::Pending
            },
            moderation_note: None,
            created_at: now,
            updated_at: now,
        };
        validate_group(&group)?;

        self.groups.create(group.clone()).await?;
        self.groups.add_member(&group.id, &actor.user_id, now).await?;
        info!(group_id = %group.id, status = %group.status, "Created group");
        Ok(group)
    }

    pub async fn get(&self, actor: &Actor, id: &str) -> Result<GroupSummary> {
        let group = self.require_visible(actor, id).await?;
        let member_count = self.groups.member_count(id).await?;
        let is_member = self.groups.is_member(id, &actor.user_id).await?;
        Ok(GroupSummary { group, member_count, is_member })
    }

    /// Search approved groups
    pub async fn list(&self, filter: &GroupFilter) -> Result<Vec<Group>> {
        let groups = self.groups.list_by_status(ModerationStatus::Approved).await?;
        Ok(filter.apply(groups))
    }

    /// Groups the caller owns or belongs to, in any status
    pub async fn list_mine(&self, actor: &Actor) -> Result<Vec<Group>> {
        self.groups.list_for_user(&actor.user_id).await
    }

    pub async fn update(&self, actor: &Actor, id: &str, update: GroupUpdate) -> Result<Group> {
        let mut group = self.require_managed(actor, id).await?;

        update.apply_to(&mut group);
        group.name = group.name.trim().to_string();
        group.description = group.description.trim().to_string();
        group.category = group.category.trim().to_string();
        group.image_url = clean_optional(group.image_url);
        validate_group(&group)?;

        if !actor.is_admin() && group.status != ModerationStatus::Pending {
            group.status = ModerationStatus::Pending;
            group.moderation_note = None;
        }
        group.updated_at = Utc::now();

        self.groups.update(group.clone()).await?;
        info!(group_id = %group.id, status = %group.status, "Updated group");
        Ok(group)
    }

    pub async fn delete(&self, actor: &Actor, id: &str) -> Result<()> {
        self.require_managed(actor, id).await?;
        if !self.groups.delete(id).await? {
            return Err(FanEventError::not_found("group", id));
        }
        info!(group_id = %id, "Deleted group");
        Ok(())
    }

    pub async fn join(&self, actor: &Actor, id: &str) -> Result<GroupSummary> {
        let group = self.require_visible(actor, id).await?;
        if !group.status.is_approved() {
            return Err(FanEventError::InvalidInput("only approved groups can be joined".into()));
        }
        if !self.groups.add_member(id, &actor.user_id, Utc::now()).await? {
            return Err(FanEventError::Conflict("already a member of this group".into()));
        }
        self.get(actor, id).await
    }

    pub async fn leave(&self, actor: &Actor, id: &str) -> Result<()> {
        let group = self.require_visible(actor, id).await?;
        if group.owner_id == actor.user_id {
            return Err(FanEventError::InvalidInput("the owner cannot leave their group".into()));
        }
        if !self.groups.remove_member(id, &actor.user_id).await? {
            return Err(FanEventError::NotFound("not a member of this group".into()));
        }
        Ok(())
    }

    pub async fn members(&self, actor: &Actor, id: &str) -> Result<Vec<GroupMember>> {
        self.require_visible(actor, id).await?;
        self.groups.members(id).await
    }

    /// Approved events attached to the group, soonest first
    pub async fn events(&self, actor: &Actor, id: &str) -> Result<Vec<Event>> {
        self.require_visible(actor, id).await?;
        let mut events: Vec<Event> = self
            .events
            .list_by_group(id)
            .await?
            .into_iter()
            .filter(|event| event.status.is_approved())
            .collect();
        events.sort_by(|a, b| a.starts_at.cmp(&b.starts_at));
        Ok(events)
    }

    async fn require_visible(&self, actor: &Actor, id: &str) -> Result<Group> {
        match self.groups.get(id).await? {
            Some(group) if group.is_visible_to(&actor.user_id, actor.role) => Ok(group),
            _ => Err(FanEventError::not_found("group", id)),
        }
    }

    async fn require_managed(&self, actor: &Actor, id: &str) -> Result<Group> {
        let group = self.require_visible(actor, id).await?;
        if !group.can_manage(&actor.user_id, actor.role) {
            return Err(FanEventError::Forbidden("only the owner can change this group".into()));
        }
        Ok(group)
    }
}

fn validate_group(group: &Group) -> Result<()> {
    let mut errors = ValidationError::new();
    errors
        .check(
            "name",
            &StringValidator::bounded(GROUP_NAME_MIN_LENGTH, GROUP_NAME_MAX_LENGTH),
            group.name.as_str(),
        )
        .check(
            "description",
            &StringValidator::new().max_length(DESCRIPTION_MAX_LENGTH),
            group.description.as_str(),
        )
        .check(
            "category",
            &StringValidator::new().max_length(CATEGORY_MAX_LENGTH),
            group.category.as_str(),
        )
        .check_optional("image_url", &UrlValidator::new(), group.image_url.as_deref());
    ensure_valid(errors)
}
