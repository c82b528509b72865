//! Builder API for ergonomic state machine construction.
//!
//! # Example
//!
//! ```
//! use signal_cycle::builder::MachineBuilder;
//! use signal_cycle::config::SignalConfig;
//! use signal_cycle::scheduler::ManualScheduler;
//!
//! let machine = MachineBuilder::new()
//!     .scheduler(ManualScheduler::new())
//!     .config(SignalConfig {
//!         green_ms: 10_000,
//!         ..SignalConfig::default()
//!     })
//!     .observer(|phase| println!("lit: {phase}"))
//!     .build()
//!     .unwrap();
//!
//! machine.start();
//! ```

pub mod error;
pub mod machine;

pub use error::BuildError;
pub use machine::MachineBuilder;
