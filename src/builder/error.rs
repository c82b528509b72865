//! Build errors for the state machine builder.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Scheduler not specified. Call .scheduler(scheduler) before .build()")]
    MissingScheduler,

    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
