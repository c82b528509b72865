//! Timer scheduling abstraction.
//!
//! The state machine never sleeps. After each phase entry it asks a
//! [`Scheduler`] to call it back once the dwell has elapsed, and control
//! returns to the host in between. Hosts pick the implementation:
//!
//! - [`ManualScheduler`]: a virtual clock advanced explicitly, for tests
//!   and hosts with their own tick source
//! - [`TokioScheduler`]: real time on a tokio runtime (feature `tokio`)

mod error;
mod manual;
#[cfg(feature = "tokio")]
mod runtime;

pub use error::SchedulerError;
pub use manual::ManualScheduler;
#[cfg(feature = "tokio")]
pub use runtime::TokioScheduler;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Deferred work handed to a scheduler.
pub type TimerCallback = Box<dyn FnOnce() + Send + 'static>;

/// Opaque handle to a scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Timer primitive consumed by the state machine.
///
/// Implementations must never invoke the callback from inside
/// `schedule_after`; it has to run later, from the host's own loop.
pub trait Scheduler: Send + Sync + 'static {
    /// Run `callback` once `delay` has elapsed.
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle;

    /// Cancel a pending callback.
    ///
    /// Returns `false` if the handle already fired or is unknown.
    fn cancel(&self, handle: TimerHandle) -> bool;
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        (**self).schedule_after(delay, callback)
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        (**self).cancel(handle)
    }
}
