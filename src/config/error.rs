//! Configuration error types.

use thiserror::Error;

/// A single rule broken by a [`SignalConfig`](super::SignalConfig).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigViolation {
    #[error("Dwell '{field}' must be greater than zero")]
    ZeroDwell { field: &'static str },

    #[error("Pedestrian green ({pedestrian_ms} ms) must not exceed normal green ({normal_ms} ms)")]
    PedestrianGreenTooLong { normal_ms: u64, pedestrian_ms: u64 },

    #[error("Pedestrian red ({pedestrian_ms} ms) must not be shorter than normal red ({normal_ms} ms)")]
    PedestrianRedTooShort { normal_ms: u64, pedestrian_ms: u64 },

    #[error("Debounce limit must be at least 1")]
    ZeroDebounceLimit,
}

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The input was not valid configuration JSON
    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configuration parsed but broke one or more rules
    #[error("Invalid configuration ({} violation(s)): {}", .0.len(), join(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
