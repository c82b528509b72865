//! Snapshot error types.

use crate::config::ConfigError;
use thiserror::Error;

/// Errors that can occur during snapshot operations
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Embedded state is inconsistent with the embedded configuration
    #[error("Snapshot debounce count {debounce_count} is not below the limit {limit}")]
    DebounceOutOfRange { debounce_count: u32, limit: u32 },

    /// Embedded configuration failed validation
    #[error("Snapshot configuration invalid: {0}")]
    InvalidConfig(#[from] ConfigError),
}
