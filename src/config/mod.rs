//! Signal timing configuration.
//!
//! Dwell times are plain milliseconds so configurations stay readable as
//! JSON. Validation uses Stillwater's `Validation` to report every broken
//! rule in one pass instead of stopping at the first.
//!
//! # Example
//!
//! ```rust
//! use signal_cycle::config::SignalConfig;
//! use signal_cycle::core::Phase;
//! use std::time::Duration;
//!
//! let config = SignalConfig::from_json(r#"{ "green_ms": 8000 }"#).unwrap();
//!
//! assert_eq!(config.dwell(Phase::Green, false), Duration::from_millis(8000));
//! assert_eq!(config.dwell(Phase::Green, true), Duration::from_millis(2000));
//! assert_eq!(config.dwell(Phase::Yellow, true), Duration::from_millis(1000));
//! ```

pub mod error;

pub use error::{ConfigError, ConfigViolation};

use crate::core::Phase;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Default green dwell
pub const DEFAULT_GREEN_MS: u64 = 5000;
/// Default green dwell while a pedestrian request is honored
pub const DEFAULT_GREEN_PEDESTRIAN_MS: u64 = 2000;
/// Default amber clearance interval
pub const DEFAULT_YELLOW_MS: u64 = 1000;
/// Default red dwell
pub const DEFAULT_RED_MS: u64 = 2000;
/// Default red dwell while a pedestrian request is honored
pub const DEFAULT_RED_PEDESTRIAN_MS: u64 = 6000;
/// Default number of consecutive entries a request is honored for
pub const DEFAULT_DEBOUNCE_LIMIT: u32 = 3;
/// Default number of retained history entries
pub const DEFAULT_HISTORY_LIMIT: usize = 64;

/// Timing and bookkeeping parameters for a signal.
///
/// Yellow has no pedestrian variant: the clearance interval is the same
/// whatever the pedestrian state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub green_ms: u64,
    pub green_pedestrian_ms: u64,
    pub yellow_ms: u64,
    pub red_ms: u64,
    pub red_pedestrian_ms: u64,
    /// Consecutive phase entries a pedestrian request is honored for
    pub debounce_limit: u32,
    /// Phase entries retained in the machine history
    pub history_limit: usize,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            green_ms: DEFAULT_GREEN_MS,
            green_pedestrian_ms: DEFAULT_GREEN_PEDESTRIAN_MS,
            yellow_ms: DEFAULT_YELLOW_MS,
            red_ms: DEFAULT_RED_MS,
            red_pedestrian_ms: DEFAULT_RED_PEDESTRIAN_MS,
            debounce_limit: DEFAULT_DEBOUNCE_LIMIT,
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl SignalConfig {
    /// Dwell in milliseconds for `phase`, given whether a pedestrian
    /// request is honored.
    pub fn dwell_ms(&self, phase: Phase, pedestrian: bool) -> u64 {
        match phase {
            Phase::Green if pedestrian => self.green_pedestrian_ms,
            Phase::Green => self.green_ms,
            Phase::Yellow => self.yellow_ms,
            Phase::Red if pedestrian => self.red_pedestrian_ms,
            Phase::Red => self.red_ms,
        }
    }

    /// Dwell for `phase` as a `Duration`.
    pub fn dwell(&self, phase: Phase, pedestrian: bool) -> Duration {
        Duration::from_millis(self.dwell_ms(phase, pedestrian))
    }

    /// Check every rule, accumulating ALL violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();

        for (field, value) in [
            ("green_ms", self.green_ms),
            ("green_pedestrian_ms", self.green_pedestrian_ms),
            ("yellow_ms", self.yellow_ms),
            ("red_ms", self.red_ms),
            ("red_pedestrian_ms", self.red_pedestrian_ms),
        ] {
            checks.push(if value == 0 {
                Validation::fail(ConfigViolation::ZeroDwell { field })
            } else {
                Validation::success(())
            });
        }

        checks.push(if self.green_pedestrian_ms > self.green_ms {
            Validation::fail(ConfigViolation::PedestrianGreenTooLong {
                normal_ms: self.green_ms,
                pedestrian_ms: self.green_pedestrian_ms,
            })
        } else {
            Validation::success(())
        });

        checks.push(if self.red_pedestrian_ms < self.red_ms {
            Validation::fail(ConfigViolation::PedestrianRedTooShort {
                normal_ms: self.red_ms,
                pedestrian_ms: self.red_pedestrian_ms,
            })
        } else {
            Validation::success(())
        });

        checks.push(if self.debounce_limit == 0 {
            Validation::fail(ConfigViolation::ZeroDebounceLimit)
        } else {
            Validation::success(())
        });

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate, collapsing the result into a `Result`.
    pub fn check(&self) -> Result<(), ConfigError> {
        match self.validate() {
            Validation::Success(()) => Ok(()),
            Validation::Failure(violations) => Err(ConfigError::Invalid(
                violations.iter().cloned().collect(),
            )),
        }
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing fields take their default values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_timings() {
        let config = SignalConfig::default();

        assert_eq!(config.dwell(Phase::Green, false), Duration::from_millis(5000));
        assert_eq!(config.dwell(Phase::Green, true), Duration::from_millis(2000));
        assert_eq!(config.dwell(Phase::Yellow, false), Duration::from_millis(1000));
        assert_eq!(config.dwell(Phase::Red, false), Duration::from_millis(2000));
        assert_eq!(config.dwell(Phase::Red, true), Duration::from_millis(6000));
        assert_eq!(config.debounce_limit, 3);
    }

    #[test]
    fn yellow_ignores_pedestrian_state() {
        let config = SignalConfig::default();
        assert_eq!(
            config.dwell(Phase::Yellow, true),
            config.dwell(Phase::Yellow, false)
        );
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SignalConfig::default().validate().is_success());
        assert!(SignalConfig::default().check().is_ok());
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let config = SignalConfig {
            yellow_ms: 0,
            green_pedestrian_ms: 9000,
            red_pedestrian_ms: 1000,
            debounce_limit: 0,
            ..SignalConfig::default()
        };

        match config.validate() {
            Validation::Failure(errors) => {
                assert_eq!(errors.len(), 4);

                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroDwell { field: "yellow_ms" })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::PedestrianGreenTooLong { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::PedestrianRedTooShort { .. })));
                assert!(errors
                    .iter()
                    .any(|e| matches!(e, ConfigViolation::ZeroDebounceLimit)));
            }
            Validation::Success(_) => panic!("Expected failures, got success"),
        }
    }

    #[test]
    fn check_reports_violations_as_error() {
        let config = SignalConfig {
            green_ms: 0,
            green_pedestrian_ms: 0,
            ..SignalConfig::default()
        };

        match config.check() {
            Err(ConfigError::Invalid(violations)) => assert_eq!(violations.len(), 2),
            other => panic!("Expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn from_json_fills_missing_fields() {
        let config = SignalConfig::from_json(r#"{ "red_pedestrian_ms": 9000 }"#).unwrap();

        assert_eq!(config.red_pedestrian_ms, 9000);
        assert_eq!(config.green_ms, DEFAULT_GREEN_MS);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn from_json_rejects_malformed_input() {
        let result = SignalConfig::from_json("{ green_ms: ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn from_json_rejects_invalid_config() {
        let result = SignalConfig::from_json(r#"{ "debounce_limit": 0 }"#);
        assert!(matches!(result, Err(ConfigError::Invalid(v)) if v == vec![ConfigViolation::ZeroDebounceLimit]));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = SignalConfig {
            green_ms: 7000,
            history_limit: 8,
            ..SignalConfig::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(SignalConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn invalid_error_message_lists_violations() {
        let err = ConfigError::Invalid(vec![ConfigViolation::ZeroDebounceLimit]);
        let message = err.to_string();
        assert!(message.contains("1 violation"));
        assert!(message.contains("Debounce limit"));
    }
}
