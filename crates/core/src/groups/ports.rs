//! Port interfaces for fan groups and memberships

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fanevent_domain::{Group, GroupMember, ModerationStatus, Result};

#[async_trait]
pub trait GroupRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Group>>;

    async fn create(&self, group: Group) -> Result<()>;

    async fn update(&self, group: Group) -> Result<()>;

    /// Delete a group and its memberships; events keep existing without a
    /// group. Returns `false` when no such group exists.
    async fn delete(&self, id: &str) -> Result<bool>;

    async fn list_by_status(&self, status: ModerationStatus) -> Result<Vec<Group>>;

    /// Groups the user owns or has joined, by name
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<Group>>;

    /// Add a member; returns `false` if the user already belongs to the group
    async fn add_member(&self, group_id: &str, user_id: &str, joined_at: DateTime<Utc>)
        -> Result<bool>;

    /// Remove a member; returns `false` if the user was not a member
    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<bool>;

    async fn is_member(&self, group_id: &str, user_id: &str) -> Result<bool>;

    async fn member_count(&self, group_id: &str) -> Result<u32>;

    /// Members with their public names, earliest joiner first
    async fn members(&self, group_id: &str) -> Result<Vec<GroupMember>>;
}
