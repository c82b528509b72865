//! Real-time scheduler backed by a tokio runtime.

use super::{Scheduler, SchedulerError, TimerCallback, TimerHandle};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type TaskMap = Arc<Mutex<HashMap<TimerHandle, JoinHandle<()>>>>;

fn lock(tasks: &TaskMap) -> MutexGuard<'_, HashMap<TimerHandle, JoinHandle<()>>> {
    tasks.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scheduler that spawns one sleeping task per timer.
///
/// Callbacks run inside the spawned task once `tokio::time::sleep`
/// completes. Cancelling aborts the task.
pub struct TokioScheduler {
    runtime: Handle,
    next_id: AtomicU64,
    tasks: TaskMap,
}

impl TokioScheduler {
    /// Bind to the runtime the caller is running on.
    ///
    /// Fails when called outside a tokio runtime, since no timers could
    /// ever fire.
    pub fn new() -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|e| SchedulerError::NoRuntime(e.to_string()))?;
        Ok(Self::with_handle(runtime))
    }

    /// Bind to an explicit runtime handle.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            next_id: AtomicU64::new(0),
            tasks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of timers that have not fired or been cancelled.
    pub fn pending(&self) -> usize {
        lock(&self.tasks).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let handle = TimerHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        let tasks = Arc::clone(&self.tasks);

        // Held across spawn so the task cannot deregister before it is registered.
        let mut registry = lock(&self.tasks);
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            lock(&tasks).remove(&handle);
            callback();
        });
        registry.insert(handle, task);
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        match lock(&self.tasks).remove(&handle) {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}
