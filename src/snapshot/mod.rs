//! Serializable snapshots of a running signal.
//!
//! A snapshot captures the machine state, its configuration and the
//! recent phase history. Pending timers and observers are not captured;
//! a restored machine is halted until resumed.

use crate::config::SignalConfig;
use crate::core::{MachineState, PhaseHistory};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Point-in-time copy of a machine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MachineSnapshot {
    /// Snapshot format version
    pub version: u32,

    /// Identifier of the machine the snapshot was taken from
    pub id: Uuid,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Machine state at that instant
    pub state: MachineState,

    /// Timing configuration
    pub config: SignalConfig,

    /// Recent phase entries
    pub history: PhaseHistory,
}

impl MachineSnapshot {
    /// Reject snapshots written by an incompatible format version.
    pub fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from JSON, checking the format version.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Encode in the compact binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }

    /// Decode from the compact binary format, checking the format version.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Phase, PhaseEntry};

    fn sample() -> MachineSnapshot {
        let mut history = PhaseHistory::with_limit(4);
        history.record(PhaseEntry {
            phase: Phase::Green,
            dwell_ms: 5000,
            pedestrian: false,
            entered_at: Utc::now(),
        });
        history.record(PhaseEntry {
            phase: Phase::Yellow,
            dwell_ms: 1000,
            pedestrian: true,
            entered_at: Utc::now(),
        });

        MachineSnapshot {
            version: SNAPSHOT_VERSION,
            id: Uuid::new_v4(),
            taken_at: Utc::now(),
            state: MachineState {
                phase: Phase::Yellow,
                auto_mode: true,
                pedestrian_requested: true,
                debounce_count: 1,
            },
            config: SignalConfig::default(),
            history,
        }
    }

    #[test]
    fn json_preserves_snapshot() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        let decoded = MachineSnapshot::from_json(&json).unwrap();

        assert_eq!(decoded, snapshot);
    }

    #[test]
    fn binary_preserves_snapshot() {
        let snapshot = sample();
        let bytes = snapshot.to_binary().unwrap();
        let decoded = MachineSnapshot::from_binary(&bytes).unwrap();

        assert_eq!(decoded.state, snapshot.state);
        assert_eq!(decoded.history, snapshot.history);
        assert_eq!(decoded.id, snapshot.id);
    }

    #[test]
    fn binary_is_smaller_than_json() {
        let snapshot = sample();
        let json = snapshot.to_json().unwrap();
        let bytes = snapshot.to_binary().unwrap();

        assert!(bytes.len() < json.len());
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let snapshot = MachineSnapshot {
            version: 99,
            ..sample()
        };
        let json = snapshot.to_json().unwrap();

        match MachineSnapshot::from_json(&json) {
            Err(SnapshotError::UnsupportedVersion { found, supported }) => {
                assert_eq!(found, 99);
                assert_eq!(supported, SNAPSHOT_VERSION);
            }
            other => panic!("Expected UnsupportedVersion, got {:?}", other),
        }
    }

    #[test]
    fn garbage_input_fails_to_decode() {
        assert!(matches!(
            MachineSnapshot::from_json("not json"),
            Err(SnapshotError::DeserializationFailed(_))
        ));
        assert!(matches!(
            MachineSnapshot::from_binary(&[1, 2, 3]),
            Err(SnapshotError::DeserializationFailed(_))
        ));
    }
}
