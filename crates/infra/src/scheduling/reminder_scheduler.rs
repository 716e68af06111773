//! Reminder sweep scheduler
//!
//! Triggers a [`ScheduledJob`] on a cron schedule. In the service the job is
//! [`ReminderSweepJob`], which asks [`ReminderService::sweep`] to emit every
//! reminder due at the current instant.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fanevent_core::ReminderService;
//! use fanevent_infra::scheduling::{
//!     ReminderScheduler, ReminderSchedulerConfig, ReminderSweepJob, SchedulerResult,
//! };
//!
//! # async fn example(service: Arc<ReminderService>) -> SchedulerResult<()> {
//! let job = Arc::new(ReminderSweepJob::new(service));
//! let mut scheduler = ReminderScheduler::with_config(
//!     ReminderSchedulerConfig {
//!         cron_expression: "0 * * * * *".into(), // every minute
//!         ..Default::default()
//!     },
//!     job,
//! )
//! .await?;
//!
//! scheduler.start().await?;
//! // ... service runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use fanevent_core::ReminderService;
use fanevent_domain::constants::DEFAULT_REMINDER_CRON;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::InfraError;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// A unit of background work run by the scheduler.
#[async_trait]
pub trait ScheduledJob: Send + Sync {
    async fn run(&self) -> Result<(), InfraError>;
}

/// Runs one reminder sweep per invocation.
pub struct ReminderSweepJob {
    service: Arc<ReminderService>,
}

impl ReminderSweepJob {
    pub fn new(service: Arc<ReminderService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ScheduledJob for ReminderSweepJob {
    async fn run(&self) -> Result<(), InfraError> {
        let report = self.service.sweep(Utc::now()).await?;
        debug!(
            events = report.events_scanned,
            matched = report.reminders_matched,
            created = report.notifications_created,
            skipped = report.duplicates_skipped,
            failed = report.failures,
            "Reminder sweep finished"
        );
        Ok(())
    }
}

/// Configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// Timeout applied to a single sweep.
    pub job_timeout: Duration,
    pub start_timeout: Duration,
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: DEFAULT_REMINDER_CRON.into(),
            job_timeout: Duration::from_secs(120),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Reminder scheduler with explicit lifecycle management.
pub struct ReminderScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    config: ReminderSchedulerConfig,
    job_id: Uuid,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    job: Arc<dyn ScheduledJob>,
}

impl ReminderScheduler {
    /// Create a scheduler with the default timeouts.
    pub async fn new(cron_expression: String, job: Arc<dyn ScheduledJob>) -> SchedulerResult<Self> {
        let config = ReminderSchedulerConfig { cron_expression, ..Default::default() };
        Self::with_config(config, job).await
    }

    /// Create a scheduler with a custom configuration.
    ///
    /// # Errors
    /// `JobRegistrationFailed` when the cron expression does not parse.
    pub async fn with_config(
        config: ReminderSchedulerConfig,
        job: Arc<dyn ScheduledJob>,
    ) -> SchedulerResult<Self> {
        let raw_scheduler = JobScheduler::new().await.map_err(SchedulerError::CreationFailed)?;

        let mut scheduler = Self {
            scheduler: Arc::new(RwLock::new(raw_scheduler)),
            config,
            job_id: Uuid::nil(),
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            job,
        };

        scheduler.job_id = scheduler.register_job().await?;
        Ok(scheduler)
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler = Arc::clone(&self.scheduler);
        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, async move {
            let guard = scheduler.write().await;
            guard.start().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
        .map_err(SchedulerError::StartFailed)?;

        let cancel = self.cancellation.clone();
        self.monitor_handle = Some(tokio::spawn(Self::monitor_task(cancel)));

        info!(cron = %self.config.cron_expression, "Reminder scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.is_running() {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();

        let scheduler = Arc::clone(&self.scheduler);
        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move {
            let mut guard = scheduler.write().await;
            guard.shutdown().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
        .map_err(SchedulerError::StopFailed)?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { seconds: join_timeout.as_secs() })??;
        }

        info!("Reminder scheduler stopped");
        Ok(())
    }

    /// Returns true when the monitor task is active.
    pub fn is_running(&self) -> bool {
        self.monitor_handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    async fn register_job(&mut self) -> SchedulerResult<Uuid> {
        if self.job_id != Uuid::nil() {
            return Ok(self.job_id);
        }

        let job = Arc::clone(&self.job);
        let job_timeout = self.config.job_timeout;

        let job_definition =
            Job::new_async(self.config.cron_expression.as_str(), move |_id, _lock| {
                let job = Arc::clone(&job);

                Box::pin(async move {
                    let started = Instant::now();
                    match tokio::time::timeout(job_timeout, job.run()).await {
                        Ok(Ok(())) => {
                            debug!(elapsed_ms = started.elapsed().as_millis(), "Job finished");
                        }
                        Ok(Err(err)) => {
                            error!(error = %err, "Scheduled job failed");
                        }
                        Err(_) => {
                            warn!(timeout_secs = job_timeout.as_secs(), "Scheduled job timed out");
                        }
                    }
                })
            })
            .map_err(SchedulerError::JobRegistrationFailed)?;

        let job_id = job_definition.guid();
        let scheduler = self.scheduler.write().await;
        scheduler.add(job_definition).await.map_err(SchedulerError::JobRegistrationFailed)?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered scheduled job");
        Ok(job_id)
    }

    async fn monitor_task(cancel: CancellationToken) {
        cancel.cancelled().await;
        debug!("Reminder scheduler monitor cancelled");
    }
}

impl Drop for ReminderScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("ReminderScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
