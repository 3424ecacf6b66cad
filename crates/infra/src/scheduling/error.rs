//! Scheduler error types

use thiserror::Error;

/// Lifecycle errors of the polling orchestrator
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Orchestrator is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Orchestrator is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Background task did not finish within the join timeout
    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },

    /// Background task panicked
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
