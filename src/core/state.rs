//! Machine state and the pure debounce bookkeeping.
//!
//! `MachineState` is plain data. The only logic here is
//! [`MachineState::register_entry`], which runs once per phase entry and
//! decides whether a pending pedestrian request is honored for that entry.

use super::phase::Phase;
use serde::{Deserialize, Serialize};

/// Aggregate state owned by a single timed state machine.
///
/// # Example
///
/// ```rust
/// use signal_cycle::core::{MachineState, Phase};
///
/// let state = MachineState::new();
/// assert_eq!(state.phase, Phase::Green);
/// assert!(state.auto_mode);
/// assert!(!state.pedestrian_requested);
/// assert_eq!(state.debounce_count, 0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineState {
    /// The lit phase
    pub phase: Phase,
    /// Whether the automatic cycle keeps rescheduling itself
    pub auto_mode: bool,
    /// Pending pedestrian request
    pub pedestrian_requested: bool,
    /// Consecutive phase entries that have honored the current request
    pub debounce_count: u32,
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineState {
    /// Initial state: Green, automatic mode on, no pedestrian request.
    pub fn new() -> Self {
        Self {
            phase: Phase::Green,
            auto_mode: true,
            pedestrian_requested: false,
            debounce_count: 0,
        }
    }

    /// Debounce bookkeeping for one phase entry.
    ///
    /// Returns `true` when the pedestrian request is honored for this
    /// entry. A request is honored for at most `limit` consecutive entries:
    /// the entry that brings the count to `limit` is still honored, and it
    /// clears the request and resets the counter. Without a request the
    /// counter is reset unconditionally.
    ///
    /// Because the request is cleared as soon as the last honored entry
    /// begins, a request raised during that entry's dwell is a fresh one
    /// and starts a new streak at the next entry.
    ///
    /// # Example
    ///
    /// ```rust
    /// use signal_cycle::core::MachineState;
    ///
    /// let mut state = MachineState::new();
    /// state.pedestrian_requested = true;
    ///
    /// assert!(state.register_entry(3));
    /// assert!(state.register_entry(3));
    /// assert!(state.register_entry(3));
    /// assert!(!state.pedestrian_requested);
    /// assert!(!state.register_entry(3));
    /// ```
    pub fn register_entry(&mut self, limit: u32) -> bool {
        if !self.pedestrian_requested {
            self.debounce_count = 0;
            return false;
        }

        self.debounce_count = self.debounce_count.saturating_add(1);
        if self.debounce_count >= limit {
            self.pedestrian_requested = false;
            self.debounce_count = 0;
        }
        true
    }
}
