//! User profile types
//!
//! Profiles are synced from the identity provider on every authenticated
//! request; the locally stored role can only be raised by an admin action
//! (organizer approval or explicit role change).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Platform role, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Organizer,
    Admin,
}

impl_domain_status_conversions!(Role {
    User => "user",
    Organizer => "organizer",
    Admin => "admin",
});

impl Role {
    /// Organizers and admins may create events and groups.
    pub fn can_organize(self) -> bool {
        self >= Self::Organizer
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }
}

/// User profile stored in the local database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    /// Subject claim issued by the identity provider
    pub auth_subject: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown to other users, falling back to the e-mail local part.
    pub fn public_name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.email.split('@').next().unwrap_or(&self.email),
        }
    }
}

/// Profile fields visible to any authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProfile {
    pub id: String,
    pub display_name: String,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub role: Role,
}

impl From<&UserProfile> for PublicProfile {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            display_name: profile.public_name().to_string(),
            avatar_url: profile.avatar_url.clone(),
            bio: profile.bio.clone(),
            role: profile.role,
        }
    }
}

/// Self-service profile edit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
}

/// Verified identity extracted from a bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityClaims {
    pub subject: String,
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
    pub role: Role,
}
