#![forbid(unsafe_code)]

//! Loading history limits from configuration files.
//!
//! ```toml
//! # rewind.toml
//! [command]
//! max_depth = 500
//!
//! [snapshot]
//! max_depth = 100
//! ```
//!
//! ```rust,ignore
//! let config = RewindConfig::from_toml_file("rewind.toml")?;
//! let mut commands = config.command_history();
//! ```
//!
//! Every field is optional. Missing fields keep the unbounded defaults, so an
//! empty file behaves like [`RewindConfig::default()`]. JSON with the same
//! shape is accepted too.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::history::{CommandHistory, HistoryConfig};
use crate::snapshot::{Restorable, SnapshotConfig, SnapshotHistory};

/// Settings for both history engines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewindConfig {
    /// Command history settings.
    pub command: HistoryConfig,
    /// Snapshot history settings.
    pub snapshot: SnapshotConfig,
}

/// Errors that can occur when loading a [`RewindConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parse error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// JSON parse error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Values that parsed but are out of range.
    #[error("validation errors: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

impl RewindConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.checked()
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.checked()
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Serialize to a TOML string.
    ///
    /// Unbounded depths are omitted, so loading the output yields the same
    /// config.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of problems; empty means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.command.max_depth == 0 {
            errors.push("command.max_depth must be > 0".into());
        }
        if self.snapshot.max_depth == 0 {
            errors.push("snapshot.max_depth must be > 0".into());
        }
        errors
    }

    /// An empty command history using these settings.
    #[must_use]
    pub fn command_history(&self) -> CommandHistory {
        CommandHistory::new(self.command.clone())
    }

    /// An empty snapshot history using these settings.
    #[must_use]
    pub fn snapshot_history<S: Restorable>(&self) -> SnapshotHistory<S> {
        SnapshotHistory::new(self.snapshot.clone())
    }

    fn checked(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            tracing::debug!(
                target: "rewind.config",
                command_max_depth = self.command.max_depth,
                snapshot_max_depth = self.snapshot.max_depth,
                "history config loaded"
            );
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}
