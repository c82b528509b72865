//! Scheduler error types.

use thiserror::Error;

/// Errors raised while setting up a scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No async runtime is available to drive timers
    #[error("No timer runtime available: {0}")]
    NoRuntime(String),
}
