//! Moderation status shared by events, groups and organizer applications

use serde::{Deserialize, Serialize};

use crate::errors::{FanEventError, Result};
use crate::impl_domain_status_conversions;

/// Tri-state gate for publicly visible content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl_domain_status_conversions!(ModerationStatus {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

/// Admin decision applied to a moderated record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationDecision {
    Approve,
    Reject,
}

impl ModerationStatus {
    /// Apply a decision. Pending records can go either way; a rejected
    /// record may later be approved. Everything else is refused.
    pub fn apply(self, decision: ModerationDecision) -> Result<Self> {
        match (self, decision) {
            (Self::Pending, ModerationDecision::Approve)
            | (Self::Rejected, ModerationDecision::Approve) => Ok(Self::Approved),
            (Self::Pending, ModerationDecision::Reject) => Ok(Self::Rejected),
            (current, decision) => Err(FanEventError::InvalidInput(format!(
                "cannot {} a record that is {current}",
                match decision {
                    ModerationDecision::Approve => "approve",
                    ModerationDecision::Reject => "reject",
                }
            ))),
        }
    }

    pub fn is_approved(self) -> bool {
        self == Self::Approved
    }
}

/// Decision payload submitted by an admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationRequest {
    pub decision: ModerationDecision,
    #[serde(default)]
    pub note: Option<String>,
}
