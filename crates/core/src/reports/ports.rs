//! Port interfaces for content reports

use async_trait::async_trait;
use fanevent_domain::{Report, ReportStatus, ReportTargetKind, Result};

#[async_trait]
pub trait ReportRepository: Send + Sync {
    async fn get(&self, id: &str) -> Result<Option<Report>>;

    async fn create(&self, report: Report) -> Result<()>;

    async fn update(&self, report: Report) -> Result<()>;

    /// The reporter's open report about a target, if any
    async fn find_open(
        &self,
        reporter_id: &str,
        target_kind: ReportTargetKind,
        target_id: &str,
    ) -> Result<Option<Report>>;

    /// Newest first, optionally restricted to one status
    async fn list(&self, status: Option<ReportStatus>) -> Result<Vec<Report>>;
}
