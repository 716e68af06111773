//! Fan group types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::moderation::ModerationStatus;
use super::user::Role;

/// A fan group owned by an organizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub image_url: Option<String>,
    pub owner_id: String,
    pub status: ModerationStatus,
    pub moderation_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Group {
    pub fn is_visible_to(&self, user_id: &str, role: Role) -> bool {
        self.status.is_approved() || role.is_admin() || self.owner_id == user_id
    }

    pub fn can_manage(&self, user_id: &str, role: Role) -> bool {
        role.is_admin() || self.owner_id == user_id
    }

    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.name, self.description, self.category).to_lowercase()
    }
}

/// Payload for creating a group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial update; absent fields are left untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// `Some(None)` (JSON `null`) removes the image
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub image_url: Option<Option<String>>,
}

impl GroupUpdate {
    pub fn apply_to(self, group: &mut Group) {
        if let Some(name) = self.name {
            group.name = name;
        }
        if let Some(description) = self.description {
            group.description = description;
        }
        if let Some(category) = self.category {
            group.category = category;
        }
        if let Some(image_url) = self.image_url {
            group.image_url = image_url;
        }
    }
}

/// Membership row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    pub group_id: String,
    pub user_id: String,
    pub display_name: String,
    pub joined_at: DateTime<Utc>,
}

/// Group enriched with membership info for the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupSummary {
    #[serde(flatten)]
    pub group: Group,
    pub member_count: u32,
    pub is_member: bool,
}
