//! Report service

use std::sync::Arc;

use chrono::Utc;
use fanevent_common::validation::{StringValidator, ValidationError};
use fanevent_domain::constants::{MODERATION_NOTE_MAX_LENGTH, REPORT_REASON_MAX_LENGTH};
use fanevent_domain::{
    new_id, FanEventError, NewReport, Notification, NotificationKind, Report, ReportStatus,
    ReportTargetKind, Result,
};
use tracing::{info, warn};

use super::ports::ReportRepository;
use crate::access::Actor;
use crate::events::ports::EventRepository;
use crate::groups::ports::GroupRepository;
use crate::messaging::ports::ConversationRepository;
use crate::notifications::ports::NotificationRepository;
use crate::users::ports::UserRepository;
use crate::validation::{clean_optional, ensure_valid};

/// Lookups used to confirm a report target exists
pub struct ReportTargets {
    pub events: Arc<dyn EventRepository>,
    pub groups: Arc<dyn GroupRepository>,
    pub users: Arc<dyn UserRepository>,
    pub conversations: Arc<dyn ConversationRepository>,
}

pub struct ReportService {
    reports: Arc<dyn ReportRepository>,
    targets: ReportTargets,
    notifications: Arc<dyn NotificationRepository>,
}

impl ReportService {
    pub fn new(
        reports: Arc<dyn ReportRepository>,
        targets: ReportTargets,
        notifications: Arc<dyn NotificationRepository>,
    ) -> Self {
        Self { reports, targets, notifications }
    }

    /// File a report. A reporter can have one open report per target.
    pub async fn file_report(&self, actor: &Actor, payload: NewReport) -> Result<Report> {
        let reason = payload.reason.trim().to_string();
        let mut errors = ValidationError::new();
        errors.check(
            "reason",
            &StringValidator::bounded(1, REPORT_REASON_MAX_LENGTH),
            reason.as_str(),
        );
        ensure_valid(errors)?;

        let target_id = payload.target_id.trim().to_string();
        if !self.target_exists(payload.target_kind, &target_id).await? {
            return Err(FanEventError::not_found(payload.target_kind.as_str(), &target_id));
        }

        if self
            .reports
            .find_open(&actor.user_id, payload.target_kind, &target_id)
            .await?
            .is_some()
        {
            return Err(FanEventError::Conflict("you already reported this".into()));
        }

        let report = Report {
            id: new_id(),
            reporter_id: actor.user_id.clone(),
            target_kind: payload.target_kind,
            target_id,
            reason,
            status: ReportStatus::Open,
            resolver_id: None,
            resolution_note: None,
            created_at: Utc::now(),
            resolved_at: None,
        };
        self.reports.create(report.clone()).await?;
        info!(report_id = %report.id, target_kind = %report.target_kind, "Report filed");
        Ok(report)
    }

    pub async fn list(&self, actor: &Actor, status: Option<ReportStatus>) -> Result<Vec<Report>> {
        actor.require_admin()?;
        self.reports.list(status).await
    }

    /// Close a report as acted upon and let the reporter know
    pub async fn resolve(&self, actor: &Actor, id: &str, note: Option<String>) -> Result<Report> {
        let report = self.close(actor, id, ReportStatus::Resolved, note).await?;

        let notification = Notification::new(
            &report.reporter_id,
            NotificationKind::ReportResolved,
            "Your report was resolved",
            report
                .resolution_note
                .clone()
                .unwrap_or_else(|| "Thanks for helping keep the community safe.".to_string()),
        );
        if let Err(err) = self.notifications.create(notification).await {
            warn!(error = %err, report_id = %id, "Failed to notify reporter");
        }
        Ok(report)
    }

    pub async fn dismiss(&self, actor: &Actor, id: &str, note: Option<String>) -> Result<Report> {
        self.close(actor, id, ReportStatus::Dismissed, note).await
    }

    async fn close(
        &self,
        actor: &Actor,
        id: &str,
        status: ReportStatus,
        note: Option<String>,
    ) -> Result<Report> {
        actor.require_admin()?;

        let note = clean_optional(note);
        let mut errors = ValidationError::new();
        errors.check_optional(
            "note",
            &StringValidator::new().max_length(MODERATION_NOTE_MAX_LENGTH),
            note.as_deref(),
        );
        ensure_valid(errors)?;

        let mut report =
            self.reports.get(id).await?.ok_or_else(|| FanEventError::not_found("report", id))?;
        if report.status != ReportStatus::Open {
            return Err(FanEventError::InvalidInput(format!("report is already {}", report.status)));
        }

        report.status = status;
        report.resolver_id = Some(actor.user_id.clone());
        report.resolution_note = note;
        report.resolved_at = Some(Utc::now());
        self.reports.update(report.clone()).await?;
        info!(report_id = %id, status = %status, "Report closed");
        Ok(report)
    }

    async fn target_exists(&self, kind: ReportTargetKind, id: &str) -> Result<bool> {
        Ok(match kind {
            ReportTargetKind::Event => self.targets.events.get(id).await?.is_some(),
            ReportTargetKind::Group => self.targets.groups.get(id).await?.is_some(),
            ReportTargetKind::User => self.targets.users.get_by_id(id).await?.is_some(),
            ReportTargetKind::Message => {
                self.targets.conversations.get_message(id).await?.is_some()
            }
        })
    }
}
