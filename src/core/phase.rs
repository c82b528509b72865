//! Signal phases.
//!
//! A phase is the single lit aspect of the signal. Exactly one phase is
//! active at any instant and phases always advance in the fixed order
//! Green → Yellow → Red → Green.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The currently lit signal aspect.
///
/// # Example
///
/// ```rust
/// use signal_cycle::core::Phase;
///
/// let phase = Phase::default();
/// assert_eq!(phase, Phase::Green);
/// assert_eq!(phase.next(), Phase::Yellow);
/// assert_eq!(phase.next().next(), Phase::Red);
/// assert_eq!(phase.next().next().next(), Phase::Green);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Traffic may proceed
    #[default]
    Green,
    /// Amber clearance interval
    Yellow,
    /// Traffic must stop; pedestrians cross
    Red,
}

impl Phase {
    /// Every phase, in cycle order.
    pub const ALL: [Phase; 3] = [Phase::Green, Phase::Yellow, Phase::Red];

    /// Get the phase's name for display/logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Green => "Green",
            Self::Yellow => "Yellow",
            Self::Red => "Red",
        }
    }

    /// The phase entered when this one's dwell expires.
    ///
    /// Yellow always sits between Green and Red; there is no path that
    /// skips the clearance interval.
    pub fn next(&self) -> Phase {
        match self {
            Self::Green => Self::Yellow,
            Self::Yellow => Self::Red,
            Self::Red => Self::Green,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
