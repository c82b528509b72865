//! Phase entry history.
//!
//! The signal cycle never terminates, so the history is a bounded window
//! over the most recent phase entries rather than a complete log.

use super::phase::Phase;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single phase entry that scheduled a timer.
///
/// # Example
///
/// ```rust
/// use signal_cycle::core::{Phase, PhaseEntry};
/// use chrono::Utc;
///
/// let entry = PhaseEntry {
///     phase: Phase::Green,
///     dwell_ms: 5000,
///     pedestrian: false,
///     entered_at: Utc::now(),
/// };
/// assert_eq!(entry.dwell().as_secs(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseEntry {
    /// The phase that was entered
    pub phase: Phase,
    /// How long the phase was scheduled to stay lit
    pub dwell_ms: u64,
    /// Whether a pedestrian request was honored for this entry
    pub pedestrian: bool,
    /// Wall-clock time of the entry
    pub entered_at: DateTime<Utc>,
}

impl PhaseEntry {
    /// The scheduled dwell as a `Duration`.
    pub fn dwell(&self) -> Duration {
        Duration::from_millis(self.dwell_ms)
    }
}

/// Bounded, ordered window of phase entries.
///
/// Once `limit` entries are held, recording a new one evicts the oldest.
/// A limit of zero disables recording.
///
/// # Example
///
/// ```rust
/// use signal_cycle::core::{Phase, PhaseEntry, PhaseHistory};
/// use chrono::Utc;
///
/// let mut history = PhaseHistory::with_limit(2);
/// for phase in Phase::ALL {
///     history.record(PhaseEntry {
///         phase,
///         dwell_ms: 1000,
///         pedestrian: false,
///         entered_at: Utc::now(),
///     });
/// }
///
/// assert_eq!(history.path(), vec![Phase::Yellow, Phase::Red]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistory {
    limit: usize,
    entries: VecDeque<PhaseEntry>,
}

impl PhaseHistory {
    /// Create an empty history holding at most `limit` entries.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            entries: VecDeque::with_capacity(limit.min(256)),
        }
    }

    /// Record an entry, evicting the oldest one when full.
    pub fn record(&mut self, entry: PhaseEntry) {
        if self.limit == 0 {
            return;
        }
        while self.entries.len() >= self.limit {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Maximum number of retained entries.
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Retained entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &PhaseEntry> {
        self.entries.iter()
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&PhaseEntry> {
        self.entries.back()
    }

    /// Phases entered, oldest first.
    pub fn path(&self) -> Vec<Phase> {
        self.entries.iter().map(|e| e.phase).collect()
    }

    /// Scheduled dwells, oldest first.
    pub fn dwells(&self) -> Vec<Duration> {
        self.entries.iter().map(PhaseEntry::dwell).collect()
    }

    /// Wall-clock time between the first and last retained entry.
    ///
    /// Returns `None` when the history is empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.entries.front()?, self.entries.back()?);
        last.entered_at
            .signed_duration_since(first.entered_at)
            .to_std()
            .ok()
    }

    /// Re-bound the history to `limit`, keeping the newest entries.
    pub fn into_limit(self, limit: usize) -> Self {
        let mut bounded = Self::with_limit(limit);
        for entry in self.entries {
            bounded.record(entry);
        }
        bounded
    }

    /// Drop every retained entry, keeping the limit.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
