//! Deterministic virtual-clock scheduler.

use super::{Scheduler, TimerCallback, TimerHandle};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
    callback: TimerCallback,
}

#[derive(Default)]
struct Clock {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer>,
    requested: Vec<Duration>,
}

impl Clock {
    /// Index of the earliest due timer; ties fire in scheduling order.
    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| (t.due, t.handle))
            .map(|(i, _)| i)
    }
}

/// Scheduler driven by an explicit virtual clock.
///
/// Time only moves when the host calls [`advance`](Self::advance) or
/// [`fire_next`](Self::fire_next). Clones share the same clock, so a test
/// can hand one clone to a state machine and drive it with another.
///
/// Callbacks run on the caller's thread with the clock unlocked, so they
/// may schedule further timers.
///
/// # Example
///
/// ```rust
/// use signal_cycle::scheduler::{ManualScheduler, Scheduler};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = ManualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&fired);
///
/// clock.schedule_after(
///     Duration::from_millis(500),
///     Box::new(move || flag.store(true, Ordering::SeqCst)),
/// );
///
/// clock.advance(Duration::from_millis(499));
/// assert!(!fired.load(Ordering::SeqCst));
///
/// clock.advance(Duration::from_millis(1));
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    clock: Arc<Mutex<Clock>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Clock> {
        self.clock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current virtual time since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.lock().now
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.lock().pending.len()
    }

    /// Virtual time at which the next timer fires.
    pub fn next_due(&self) -> Option<Duration> {
        let clock = self.lock();
        clock.earliest().map(|i| clock.pending[i].due)
    }

    /// Every delay passed to `schedule_after`, in call order.
    pub fn requested_delays(&self) -> Vec<Duration> {
        self.lock().requested.clone()
    }

    /// Jump to the earliest pending timer and run it.
    ///
    /// Returns the handle that fired, or `None` when nothing is pending.
    pub fn fire_next(&self) -> Option<TimerHandle> {
        let timer = {
            let mut clock = self.lock();
            let index = clock.earliest()?;
            let timer = clock.pending.swap_remove(index);
            clock.now = clock.now.max(timer.due);
            timer
        };
        (timer.callback)();
        Some(timer.handle)
    }

    /// Move the clock forward by `by`, firing every timer that comes due.
    ///
    /// Timers scheduled by callbacks during the advance also fire if they
    /// fall inside the window. Returns the number of callbacks run.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.now() + by;
        let mut fired = 0;

        loop {
            let timer = {
                let mut clock = self.lock();
                let Some(index) = clock.earliest() else {
                    break;
                };
                if clock.pending[index].due > target {
                    break;
                }
                let timer = clock.pending.swap_remove(index);
                clock.now = timer.due;
                timer
            };
            (timer.callback)();
            fired += 1;
        }

        let mut clock = self.lock();
        clock.now = clock.now.max(target);
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&self, delay: Duration, callback: TimerCallback) -> TimerHandle {
        let mut clock = self.lock();
        clock.next_id += 1;
        let handle = TimerHandle::new(clock.next_id);
        let due = clock.now + delay;
        clock.requested.push(delay);
        clock.pending.push(PendingTimer {
            handle,
            due,
            callback,
        });
        handle
    }

    fn cancel(&self, handle: TimerHandle) -> bool {
        let mut clock = self.lock();
        let before = clock.pending.len();
        clock.pending.retain(|t| t.handle != handle);
        clock.pending.len() != before
    }
}
