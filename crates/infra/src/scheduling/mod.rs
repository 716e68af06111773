//! Cron-based background jobs
//!
//! Schedulers own their lifecycle explicitly: `start`/`stop`, a tracked
//! monitor task, a cancellation token, and a timeout around every job run.

pub mod error;
pub mod reminder_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use reminder_scheduler::{
    ReminderScheduler, ReminderSchedulerConfig, ReminderSweepJob, ScheduledJob,
};
