//! Dashboard service

use std::sync::Arc;

use chrono::Utc;
use fanevent_domain::{AdminDashboard, OrganizerEventStats, Result};

use super::ports::DashboardRepository;
use crate::access::Actor;

pub struct DashboardService {
    stats: Arc<dyn DashboardRepository>,
}

impl DashboardService {
    pub fn new(stats: Arc<dyn DashboardRepository>) -> Self {
        Self { stats }
    }

    pub async fn admin(&self, actor: &Actor) -> Result<AdminDashboard> {
        actor.require_admin()?;
        self.stats.admin_dashboard(Utc::now()).await
    }

    /// Engagement for each of the caller's events
    pub async fn organizer(&self, actor: &Actor) -> Result<Vec<OrganizerEventStats>> {
        actor.require_organizer()?;
        self.stats.organizer_event_stats(&actor.user_id).await
    }
}
