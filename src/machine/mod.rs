//! Timer-driven signal state machine.
//!
//! [`TimedStateMachine`] owns its state and schedules its own re-entry
//! after every phase. The host only starts and stops the cycle, raises
//! pedestrian requests, and observes phase entries.
//!
//! All mutation goes through one mutex, so a transition step, a timer
//! firing and the external setters never interleave. Observers run with
//! the lock released and may call back into the machine.
//!
//! # Example
//!
//! ```rust
//! use signal_cycle::core::Phase;
//! use signal_cycle::machine::TimedStateMachine;
//! use signal_cycle::scheduler::ManualScheduler;
//! use std::time::Duration;
//!
//! let clock = ManualScheduler::new();
//! let machine = TimedStateMachine::new(clock.clone());
//!
//! machine.start();
//! assert_eq!(machine.current_phase(), Phase::Green);
//!
//! clock.advance(Duration::from_millis(5000));
//! assert_eq!(machine.current_phase(), Phase::Yellow);
//!
//! machine.request_pedestrian();
//! clock.advance(Duration::from_millis(1000));
//! assert_eq!(machine.current_phase(), Phase::Red);
//! assert_eq!(clock.next_due(), Some(Duration::from_millis(12000)));
//! ```

use crate::builder::MachineBuilder;
use crate::config::{ConfigError, SignalConfig};
use crate::core::{MachineState, Phase, PhaseEntry, PhaseHistory};
use crate::scheduler::{Scheduler, TimerHandle};
use crate::snapshot::{MachineSnapshot, SnapshotError, SNAPSHOT_VERSION};
use chrono::Utc;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, info, trace};
use uuid::Uuid;

/// Callback invoked once per phase entry.
pub type PhaseObserver = Arc<dyn Fn(Phase) + Send + Sync>;

struct Shared {
    state: MachineState,
    /// Bumped whenever outstanding timers must be ignored
    generation: u64,
    pending: Option<TimerHandle>,
    history: PhaseHistory,
}

struct Inner<T: Scheduler> {
    id: Uuid,
    config: SignalConfig,
    scheduler: T,
    shared: Mutex<Shared>,
    observers: Mutex<Vec<PhaseObserver>>,
}

/// Cyclic Green → Yellow → Red signal driven by expiring timers.
///
/// Cloning yields another handle to the same machine. Pending timers hold
/// only a weak reference, so dropping the last handle ends the cycle.
pub struct TimedStateMachine<T: Scheduler> {
    inner: Arc<Inner<T>>,
}

impl<T: Scheduler> Clone for TimedStateMachine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Scheduler> TimedStateMachine<T> {
    /// Create a machine with the default timings.
    ///
    /// The machine starts in Green with automatic mode on but does nothing
    /// until [`start`](Self::start) is called.
    pub fn new(scheduler: T) -> Self {
        Self::from_parts(
            Uuid::new_v4(),
            SignalConfig::default(),
            scheduler,
            MachineState::new(),
            None,
            Vec::new(),
        )
    }

    /// Start a fluent builder.
    pub fn builder() -> MachineBuilder<T> {
        MachineBuilder::new()
    }

    /// Create a machine with custom timings.
    pub fn with_config(config: SignalConfig, scheduler: T) -> Result<Self, ConfigError> {
        config.check()?;
        Ok(Self::from_parts(
            Uuid::new_v4(),
            config,
            scheduler,
            MachineState::new(),
            None,
            Vec::new(),
        ))
    }

    pub(crate) fn from_parts(
        id: Uuid,
        config: SignalConfig,
        scheduler: T,
        state: MachineState,
        history: Option<PhaseHistory>,
        observers: Vec<PhaseObserver>,
    ) -> Self {
        let history = history.unwrap_or_else(|| PhaseHistory::with_limit(config.history_limit));
        Self {
            inner: Arc::new(Inner {
                id,
                config,
                scheduler,
                shared: Mutex::new(Shared {
                    state,
                    generation: 0,
                    pending: None,
                    history,
                }),
                observers: Mutex::new(observers),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Shared> {
        self.inner
            .shared
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Unique identifier of this machine, used in logs and snapshots.
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    pub fn config(&self) -> &SignalConfig {
        &self.inner.config
    }

    pub fn scheduler(&self) -> &T {
        &self.inner.scheduler
    }

    /// Get the lit phase (pure read).
    pub fn current_phase(&self) -> Phase {
        self.lock().state.phase
    }

    /// Whether automatic mode is on.
    pub fn is_running(&self) -> bool {
        self.lock().state.auto_mode
    }

    /// Copy of the full machine state.
    pub fn state(&self) -> MachineState {
        self.lock().state
    }

    /// The outstanding timer, if any.
    pub fn pending_timer(&self) -> Option<TimerHandle> {
        self.lock().pending
    }

    /// Copy of the recent phase entries.
    pub fn history(&self) -> PhaseHistory {
        self.lock().history.clone()
    }

    /// Register an observer for phase entries.
    ///
    /// Observers are called in registration order, once per phase entry,
    /// before that entry's timer is scheduled.
    pub fn subscribe<F>(&self, observer: F)
    where
        F: Fn(Phase) + Send + Sync + 'static,
    {
        self.inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(observer));
    }

    /// Start (or restart) the automatic cycle from Green.
    ///
    /// Any pending timer is cancelled, so restarting never leaves two
    /// cycles racing. Green is entered synchronously before this returns.
    pub fn start(&self) {
        let mut shared = self.lock();
        shared.state.auto_mode = true;
        shared.state.phase = Phase::Green;
        self.supersede(&mut shared);
        info!(machine = %self.inner.id, "automatic cycle started");
        self.enter(shared);
    }

    /// Resume the automatic cycle from the current phase.
    ///
    /// Re-enters the current phase with a fresh dwell. Used after
    /// [`halt`](Self::halt) or [`restore`](Self::restore).
    pub fn resume(&self) {
        let mut shared = self.lock();
        shared.state.auto_mode = true;
        self.supersede(&mut shared);
        info!(machine = %self.inner.id, phase = %shared.state.phase, "automatic cycle resumed");
        self.enter(shared);
    }

    /// Stop the cycle at the next phase entry.
    ///
    /// The pending timer is left in place. When it fires the phase still
    /// advances, but nothing is displayed and no further timer is
    /// scheduled.
    ///
    /// Observers are not told about that last advance, so the last phase
    /// they saw lags [`current_phase`](Self::current_phase) by one. Read
    /// the final phase from the machine, not from an observer.
    pub fn stop(&self) {
        let mut shared = self.lock();
        shared.state.auto_mode = false;
        info!(
            machine = %self.inner.id,
            pending = shared.pending.is_some(),
            "automatic cycle stopping at next phase entry"
        );
    }

    /// Stop the cycle immediately, cancelling the pending timer.
    ///
    /// The current phase is kept.
    pub fn halt(&self) {
        let mut shared = self.lock();
        shared.state.auto_mode = false;
        self.supersede(&mut shared);
        info!(machine = %self.inner.id, phase = %shared.state.phase, "automatic cycle halted");
    }

    /// Raise the pedestrian request.
    ///
    /// Only sets the flag; the pending timer is untouched and the request
    /// takes effect at the next phase entry.
    pub fn request_pedestrian(&self) {
        let mut shared = self.lock();
        shared.state.pedestrian_requested = true;
        trace!(
            machine = %self.inner.id,
            phase = %shared.state.phase,
            debounce_count = shared.state.debounce_count,
            "pedestrian request raised"
        );
    }

    /// Capture the current state, configuration and history.
    pub fn snapshot(&self) -> MachineSnapshot {
        let shared = self.lock();
        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            id: self.inner.id,
            taken_at: Utc::now(),
            state: shared.state,
            config: self.inner.config.clone(),
            history: shared.history.clone(),
        }
    }

    /// Rebuild a machine from a snapshot.
    ///
    /// The restored machine keeps the snapshot's phase, pedestrian request,
    /// debounce count and history, but is halted: no timer is scheduled
    /// until [`resume`](Self::resume) or [`start`](Self::start).
    pub fn restore(snapshot: MachineSnapshot, scheduler: T) -> Result<Self, SnapshotError> {
        snapshot.check_version()?;
        snapshot.config.check()?;
        if snapshot.state.debounce_count >= snapshot.config.debounce_limit {
            return Err(SnapshotError::DebounceOutOfRange {
                debounce_count: snapshot.state.debounce_count,
                limit: snapshot.config.debounce_limit,
            });
        }

        let MachineSnapshot {
            id,
            state,
            config,
            history,
            ..
        } = snapshot;

        let history = history.into_limit(config.history_limit);
        info!(machine = %id, phase = %state.phase, "machine restored from snapshot");
        Ok(Self::from_parts(
            id,
            config,
            scheduler,
            MachineState {
                auto_mode: false,
                ..state
            },
            Some(history),
            Vec::new(),
        ))
    }

    /// Invalidate any outstanding timer.
    fn supersede(&self, shared: &mut Shared) {
        shared.generation += 1;
        if let Some(handle) = shared.pending.take() {
            let cancelled = self.inner.scheduler.cancel(handle);
            trace!(machine = %self.inner.id, %handle, cancelled, "pending timer superseded");
        }
    }

    /// Transition step: runs once per phase entry.
    fn enter(&self, mut shared: MutexGuard<'_, Shared>) {
        if !shared.state.auto_mode {
            debug!(
                machine = %self.inner.id,
                phase = %shared.state.phase,
                "automatic mode off, cycle ended"
            );
            return;
        }

        let pedestrian = shared
            .state
            .register_entry(self.inner.config.debounce_limit);
        let phase = shared.state.phase;
        let dwell_ms = self.inner.config.dwell_ms(phase, pedestrian);
        shared.history.record(PhaseEntry {
            phase,
            dwell_ms,
            pedestrian,
            entered_at: Utc::now(),
        });
        let generation = shared.generation;
        drop(shared);

        debug!(machine = %self.inner.id, %phase, dwell_ms, pedestrian, "phase entered");
        self.notify(phase);

        let mut shared = self.lock();
        if shared.generation != generation {
            trace!(machine = %self.inner.id, %phase, "phase entry superseded by observer");
            return;
        }

        let weak: Weak<Inner<T>> = Arc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule_after(
            self.inner.config.dwell(phase, pedestrian),
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    TimedStateMachine { inner }.fire(generation);
                }
            }),
        );
        shared.pending = Some(handle);
    }

    /// Timer expiry: advance to the next phase and run the step again.
    fn fire(&self, generation: u64) {
        let mut shared = self.lock();
        if shared.generation != generation {
            trace!(machine = %self.inner.id, "stale timer ignored");
            return;
        }
        shared.pending = None;
        shared.state.phase = shared.state.phase.next();
        self.enter(shared);
    }

    fn notify(&self, phase: Phase) {
        let observers: Vec<PhaseObserver> = self
            .inner
            .observers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for observer in observers {
            observer(phase);
        }
    }
}
