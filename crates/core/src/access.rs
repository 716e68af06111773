//! Caller identity and role guards
//!
//! Every service operation that depends on who is calling takes an
//! [`Actor`]. The API layer builds it from the verified bearer token and the
//! stored profile.

use fanevent_domain::{FanEventError, Result, Role};

/// Authenticated caller with their effective role
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self { user_id: user_id.into(), role }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(FanEventError::Forbidden("admin role required".into()))
        }
    }

    pub fn require_organizer(&self) -> Result<()> {
        if self.role.can_organize() {
            Ok(())
        } else {
            Err(FanEventError::Forbidden("organizer role required".into()))
        }
    }
}
