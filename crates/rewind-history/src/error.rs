#![forbid(unsafe_code)]

//! Error types for the history engines.
//!
//! Two layers exist:
//!
//! - [`CommandError`] is what a caller-supplied command reports when its
//!   `undo` or `revert_to_snapshot` cannot be carried out (the live state it
//!   targets is gone, or has drifted).
//! - [`HistoryError`] is what [`CommandHistory`](crate::CommandHistory)
//!   returns: either a contract violation (navigating past either end of the
//!   history) or the command's own error, passed through unchanged.

use thiserror::Error;

/// Result of a command's `undo` or `revert_to_snapshot`.
pub type CommandResult = Result<(), CommandError>;

/// Errors reported by a command while mutating live state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// The object the command targets no longer exists.
    #[error("target {0} not found")]
    TargetNotFound(String),

    /// Live state no longer matches what the command recorded.
    #[error("state drift: expected '{expected}', got '{actual}'")]
    StateDrift { expected: String, actual: String },

    /// The command cannot run in its current configuration.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Anything else.
    #[error("{0}")]
    Other(String),
}

/// Errors returned by [`CommandHistory`](crate::CommandHistory) navigation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
    /// `undo` was called while `can_undo()` was false.
    #[error("nothing to undo (cursor {cursor} of {len})")]
    NothingToUndo { cursor: usize, len: usize },

    /// `redo` was called while `can_redo()` was false.
    #[error("nothing to redo (cursor {cursor} of {len})")]
    NothingToRedo { cursor: usize, len: usize },

    /// The command itself failed; the cursor was not moved.
    #[error(transparent)]
    Command(#[from] CommandError),
}

impl HistoryError {
    /// True for the two navigation contract violations.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::NothingToUndo { .. } | Self::NothingToRedo { .. })
    }
}
