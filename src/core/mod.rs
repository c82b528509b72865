//! Core signal types and logic.
//!
//! This module contains the pure part of the signal controller:
//! - The closed `Phase` enumeration and its cycle order
//! - `MachineState` and the pedestrian debounce bookkeeping
//! - Bounded phase entry history
//!
//! Nothing in this module touches timers or observers.

mod history;
mod phase;
mod state;

pub use history::{PhaseEntry, PhaseHistory};
pub use phase::Phase;
pub use state::MachineState;
