//! Application context - dependency injection container
//!
//! Opens the database, wires every SQLite repository into its port and
//! builds the services the handlers call. One context is shared by all
//! requests behind an `Arc`.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use fanevent_core::{
    ApplicationRepository, ConversationRepository, DashboardService, EventRepository, EventService,
    ExportService, GroupRepository, GroupService, LikeRepository, LikeService, MessagingService,
    ModerationService, NotificationRepository, NotificationService, OrganizerApplicationService,
    ReminderService, ReportService, ReportTargets, RsvpRepository, RsvpService, UserRepository,
    UserService,
};
use fanevent_domain::{Config, FanEventError, Result};
use fanevent_infra::{
    DbManager, JwtVerifier, ReminderScheduler, ReminderSchedulerConfig, ReminderSweepJob,
    SqliteApplicationRepository, SqliteConversationRepository, SqliteDashboardRepository,
    SqliteEventRepository, SqliteGroupRepository, SqliteLikeRepository,
    SqliteNotificationRepository, SqliteReminderRepository, SqliteReportRepository,
    SqliteRsvpRepository, SqliteUserRepository,
};
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub db: Arc<DbManager>,
    pub verifier: JwtVerifier,

    pub users: Arc<UserService>,
    pub events: Arc<EventService>,
    pub groups: Arc<GroupService>,
    pub rsvps: Arc<RsvpService>,
    pub likes: Arc<LikeService>,
    pub reminders: Arc<ReminderService>,
    pub messaging: Arc<MessagingService>,
    pub notifications: Arc<NotificationService>,
    pub applications: Arc<OrganizerApplicationService>,
    pub reports: Arc<ReportService>,
    pub moderation: Arc<ModerationService>,
    pub dashboard: Arc<DashboardService>,
    pub exports: Arc<ExportService>,
}

impl AppContext {
    /// Open the database, apply the schema and wire every service.
    ///
    /// # Errors
    /// Fails when the JWT secret is missing, the database directory cannot
    /// be created, or the schema cannot be applied.
    pub async fn new(config: Config) -> Result<Self> {
        let verifier = JwtVerifier::new(&config.auth)?;

        if let Some(parent) = Path::new(&config.database.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    FanEventError::Internal(format!(
                        "failed to create database directory {}: {}",
                        parent.display(),
                        err
                    ))
                })?;
            }
        }

        let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
        let migrate_db = Arc::clone(&db);
        tokio::task::spawn_blocking(move || migrate_db.run_migrations())
            .await
            .map_err(|err| FanEventError::Internal(format!("migration task failed: {err}")))??;

        let user_repo: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db.clone()));
        let event_repo: Arc<dyn EventRepository> =
            Arc::new(SqliteEventRepository::new(db.clone()));
        let group_repo: Arc<dyn GroupRepository> =
            Arc::new(SqliteGroupRepository::new(db.clone()));
        let rsvp_repo: Arc<dyn RsvpRepository> = Arc::new(SqliteRsvpRepository::new(db.clone()));
        let like_repo: Arc<dyn LikeRepository> = Arc::new(SqliteLikeRepository::new(db.clone()));
        let notification_repo: Arc<dyn NotificationRepository> =
            Arc::new(SqliteNotificationRepository::new(db.clone()));
        let conversation_repo: Arc<dyn ConversationRepository> =
            Arc::new(SqliteConversationRepository::new(db.clone()));
        let application_repo: Arc<dyn ApplicationRepository> =
            Arc::new(SqliteApplicationRepository::new(db.clone()));

        let users = Arc::new(UserService::new(user_repo.clone()));
        let events = Arc::new(EventService::new(
            event_repo.clone(),
            group_repo.clone(),
            rsvp_repo.clone(),
            like_repo.clone(),
        ));
        let groups = Arc::new(GroupService::new(group_repo.clone(), event_repo.clone()));
        let rsvps = Arc::new(RsvpService::new(event_repo.clone(), rsvp_repo.clone()));
        let likes = Arc::new(LikeService::new(event_repo.clone(), like_repo));
        let reminders = Arc::new(ReminderService::new(
            event_repo.clone(),
            Arc::new(SqliteReminderRepository::new(db.clone())),
            notification_repo.clone(),
            config.reminders.lookahead_minutes,
        ));
        let messaging = Arc::new(MessagingService::new(
            conversation_repo.clone(),
            user_repo.clone(),
            notification_repo.clone(),
        ));
        let notifications = Arc::new(NotificationService::new(notification_repo.clone()));
        let applications = Arc::new(OrganizerApplicationService::new(
            application_repo,
            user_repo.clone(),
            notification_repo.clone(),
        ));
        let reports = Arc::new(ReportService::new(
            Arc::new(SqliteReportRepository::new(db.clone())),
            ReportTargets {
                events: event_repo.clone(),
                groups: group_repo.clone(),
                users: user_repo.clone(),
                conversations: conversation_repo,
            },
            notification_repo.clone(),
        ));
        let moderation =
            Arc::new(ModerationService::new(event_repo.clone(), group_repo, notification_repo));
        let dashboard = Arc::new(DashboardService::new(Arc::new(SqliteDashboardRepository::new(
            db.clone(),
        ))));
        let exports = Arc::new(ExportService::new(event_repo, rsvp_repo, user_repo));

        info!(path = %config.database.path, "Application context ready");

        Ok(Self {
            config,
            db,
            verifier,
            users,
            events,
            groups,
            rsvps,
            likes,
            reminders,
            messaging,
            notifications,
            applications,
            reports,
            moderation,
            dashboard,
            exports,
        })
    }

    /// Build and start the reminder sweep scheduler.
    ///
    /// Returns `None` when reminders are disabled in the configuration.
    pub async fn start_reminder_scheduler(&self) -> Result<Option<ReminderScheduler>> {
        if !self.config.reminders.enabled {
            info!("Reminder sweep disabled by configuration");
            return Ok(None);
        }

        let job = Arc::new(ReminderSweepJob::new(Arc::clone(&self.reminders)));
        let config = ReminderSchedulerConfig {
            cron_expression: self.config.reminders.cron_expression.clone(),
            ..Default::default()
        };

        let mut scheduler = ReminderScheduler::with_config(config, job).await?;
        scheduler.start().await?;
        Ok(Some(scheduler))
    }

    /// Report the health of the service and its dependencies.
    pub async fn health_check(&self) -> HealthStatus {
        HealthStatus::new().add_component(self.check_database_health().await)
    }

    async fn check_database_health(&self) -> ComponentHealth {
        let db = Arc::clone(&self.db);
        match tokio::task::spawn_blocking(move || db.health_check()).await {
            Ok(Ok(())) => ComponentHealth::healthy("database"),
            Ok(Err(err)) => {
                warn!(error = %err, "Database health check failed");
                ComponentHealth::unhealthy("database", err.to_string())
            }
            Err(err) => {
                warn!(error = %err, "Database health check task failed");
                ComponentHealth::unhealthy("database", format!("task failed: {err}"))
            }
        }
    }
}
