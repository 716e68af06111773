//! Scheduler error types

use fanevent_domain::FanEventError;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    #[error("Failed to create scheduler: {0}")]
    CreationFailed(JobSchedulerError),

    #[error("Failed to start scheduler: {0}")]
    StartFailed(JobSchedulerError),

    #[error("Failed to stop scheduler: {0}")]
    StopFailed(JobSchedulerError),

    /// Bad cron expression or the scheduler refused the job
    #[error("Failed to register job: {0}")]
    JobRegistrationFailed(JobSchedulerError),

    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] tokio::task::JoinError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let domain_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                FanEventError::InvalidInput(err.to_string())
            }
            SchedulerError::JobRegistrationFailed(_) => FanEventError::Config(err.to_string()),
            _ => FanEventError::Internal(err.to_string()),
        };
        InfraError(domain_err)
    }
}

impl From<SchedulerError> for FanEventError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_errors_map_to_invalid_input() {
        let err: FanEventError = SchedulerError::AlreadyRunning.into();
        assert_eq!(err, FanEventError::InvalidInput("Scheduler already running".into()));
    }

    #[test]
    fn timeout_maps_to_internal() {
        let err: FanEventError = SchedulerError::Timeout { seconds: 5 }.into();
        assert_eq!(err, FanEventError::Internal("Operation timed out after 5s".into()));
    }
}
