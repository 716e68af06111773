//! Organizer application types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::moderation::ModerationStatus;

/// Request from a user to be granted the organizer role
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganizerApplication {
    pub id: String,
    pub user_id: String,
    pub organization_name: Option<String>,
    pub motivation: String,
    pub experience: Option<String>,
    pub status: ModerationStatus,
    pub reviewer_id: Option<String>,
    pub review_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrganizerApplication {
    #[serde(default)]
    pub organization_name: Option<String>,
    pub motivation: String,
    #[serde(default)]
    pub experience: Option<String>,
}

/// Admin review payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewNote {
    #[serde(default)]
    pub note: Option<String>,
}
