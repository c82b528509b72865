//! Signal Cycle: a timer-driven traffic signal state machine
//!
//! The signal cycles Green → Yellow → Red → Green. Every transition is
//! triggered by an expiring timer rather than an external event; the only
//! external input is a pedestrian request, which shortens the next Green
//! and lengthens the next Red for a bounded number of phase entries.
//!
//! The core state logic is pure data plus one bookkeeping function. Time
//! is injected through the [`Scheduler`] trait, so the same machine runs
//! against a virtual clock in tests and against tokio in production.
//!
//! # Core Concepts
//!
//! - **Phase**: The closed three-variant signal aspect
//! - **Dwell**: How long a phase stays lit, chosen at phase entry
//! - **Debounce**: A pedestrian request is honored for at most
//!   `debounce_limit` consecutive entries, then cleared
//! - **Scheduler**: The only environment dependency
//!
//! # Example
//!
//! ```rust
//! use signal_cycle::{ManualScheduler, Phase, TimedStateMachine};
//! use std::time::Duration;
//!
//! let clock = ManualScheduler::new();
//! let machine = TimedStateMachine::new(clock.clone());
//!
//! machine.subscribe(|phase| println!("lit: {phase}"));
//! machine.start();
//!
//! clock.advance(Duration::from_millis(6000));
//! assert_eq!(machine.current_phase(), Phase::Red);
//!
//! machine.stop();
//! clock.advance(Duration::from_millis(2000));
//! assert_eq!(machine.current_phase(), Phase::Green);
//! assert!(machine.pending_timer().is_none());
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod machine;
pub mod scheduler;
pub mod snapshot;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use config::{ConfigError, SignalConfig};
pub use crate::core::{MachineState, Phase, PhaseEntry, PhaseHistory};
pub use machine::TimedStateMachine;
pub use scheduler::{ManualScheduler, Scheduler, TimerHandle};
#[cfg(feature = "tokio")]
pub use scheduler::TokioScheduler;
pub use snapshot::{MachineSnapshot, SnapshotError};
