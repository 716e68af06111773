//! Content report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportTargetKind {
    Event,
    Group,
    User,
    Message,
}

impl_domain_status_conversions!(ReportTargetKind {
    Event => "event",
    Group => "group",
    User => "user",
    Message => "message",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    #[default]
    Open,
    Resolved,
    Dismissed,
}

impl_domain_status_conversions!(ReportStatus {
    Open => "open",
    Resolved => "resolved",
    Dismissed => "dismissed",
});

/// User-filed report about a piece of content or another user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: String,
    pub reporter_id: String,
    pub target_kind: ReportTargetKind,
    pub target_id: String,
    pub reason: String,
    pub status: ReportStatus,
    pub resolver_id: Option<String>,
    pub resolution_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReport {
    pub target_kind: ReportTargetKind,
    pub target_id: String,
    pub reason: String,
}
