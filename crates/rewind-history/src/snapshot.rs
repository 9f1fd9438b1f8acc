#![forbid(unsafe_code)]

//! Whole-state snapshot history with a pointer.
//!
//! [`SnapshotHistory`] never asks the host to compute an inverse: each entry
//! is a full capture of application state, and navigating simply restores
//! the neighbouring capture. Use it when state is cheap to capture and
//! restore but awkward to invert (derived layout or view state, for
//! example). For reversible mutations use
//! [`CommandHistory`](crate::CommandHistory).
//!
//! # Invariants
//!
//! 1. `pointer < entries.len()` whenever the history is non-empty; the
//!    entry at `pointer` is the one matching live state.
//! 2. After `add_state`, `pointer == entries.len() - 1`.
//! 3. Two adjacent entries are never equal right after an `add_state`.
//! 4. The pointer moves only after `restore()` returned `Ok`.
//!
//! # Truncation
//!
//! ```text
//! [s1, s2, s3]  pointer 1   add_state(s4)   [s1, s2, s4]  pointer 2
//! [s1, s2, s3]  pointer 0   add_state(s4)   [s4]          pointer 0
//! ```
//!
//! The second row is intentional: when the pointer sits on the first
//! recorded state, adding a new state discards the whole history, entry 0
//! included, instead of keeping the prefix as every later position does.

use std::fmt;
use std::slice;

const TARGET: &str = "rewind.snapshot";

/// A captured application state that can be written back to live state.
///
/// Equality must be value equality over the captured fields, free of side
/// effects, and independent of [`restore`](Self::restore). Two separately
/// captured but identical states are equal; that is what lets
/// [`SnapshotHistory::add_state`] collapse adjacent duplicates.
pub trait Restorable: PartialEq {
    /// Error reported when the live state cannot be overwritten.
    type Error: fmt::Display;

    /// Overwrite live state with this snapshot.
    fn restore(&self) -> Result<(), Self::Error>;
}

/// Configuration for a [`SnapshotHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct SnapshotConfig {
    /// Maximum number of stored snapshots. Oldest snapshots are evicted
    /// when an `add_state` exceeds it.
    #[cfg_attr(
        feature = "config",
        serde(skip_serializing_if = "crate::history::is_unbounded")
    )]
    pub max_depth: usize,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl SnapshotConfig {
    /// Create a configuration with the given depth limit.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No depth limit.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// Linear undo/redo list of whole-state snapshots.
pub struct SnapshotHistory<S> {
    entries: Vec<S>,
    /// Index of the entry matching live state. Zero when empty.
    pointer: usize,
    config: SnapshotConfig,
}

impl<S> fmt::Debug for SnapshotHistory<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnapshotHistory")
            .field("len", &self.entries.len())
            .field("pointer", &self.pointer)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Restorable> Default for SnapshotHistory<S> {
    fn default() -> Self {
        Self::new(SnapshotConfig::default())
    }
}

impl<S: Restorable> SnapshotHistory<S> {
    /// Create an empty history.
    #[must_use]
    pub fn new(config: SnapshotConfig) -> Self {
        Self {
            entries: Vec::new(),
            pointer: 0,
            config,
        }
    }

    // ====================================================================
    // Core Operations
    // ====================================================================

    /// Record `snapshot` as the state matching live state.
    ///
    /// Drops the redo branch (see the module docs for the first-entry
    /// case), replaces the last entry if it equals `snapshot`, then appends.
    pub fn add_state(&mut self, snapshot: S) {
        let mut truncated = 0;
        if self.pointer + 1 < self.entries.len() {
            let start = if self.pointer > 0 { self.pointer + 1 } else { 0 };
            truncated = self.entries.len() - start;
            self.entries.truncate(start);
        }

        let deduped = self.entries.last().is_some_and(|last| *last == snapshot);
        if deduped {
            self.entries.pop();
        }

        self.entries.push(snapshot);
        let evicted = self.enforce_depth();
        self.pointer = self.entries.len().saturating_sub(1);

        tracing::debug!(
            target: TARGET,
            op = "add_state",
            pointer = self.pointer,
            len = self.entries.len(),
            truncated,
            deduped,
            evicted,
            "snapshot recorded"
        );
    }

    /// Restore the previous snapshot.
    ///
    /// Returns `Ok(false)` without touching anything when the history is
    /// empty or already at its first entry.
    ///
    /// # Errors
    ///
    /// Returns the snapshot's own error if `restore` fails; the pointer is
    /// not moved.
    pub fn undo(&mut self) -> Result<bool, S::Error> {
        let _span = tracing::debug_span!("snapshot.undo", pointer = self.pointer).entered();

        if !self.can_undo() {
            tracing::debug!(
                target: TARGET,
                op = "undo",
                pointer = self.pointer,
                len = self.entries.len(),
                "nothing to undo"
            );
            return Ok(false);
        }
        self.step_to(self.pointer - 1, "undo")
    }

    /// Restore the next snapshot.
    ///
    /// Returns `Ok(false)` without touching anything when the history is
    /// empty or already at its last entry.
    ///
    /// # Errors
    ///
    /// Returns the snapshot's own error if `restore` fails; the pointer is
    /// not moved.
    pub fn redo(&mut self) -> Result<bool, S::Error> {
        let _span = tracing::debug_span!("snapshot.redo", pointer = self.pointer).entered();

        if !self.can_redo() {
            tracing::debug!(
                target: TARGET,
                op = "redo",
                pointer = self.pointer,
                len = self.entries.len(),
                "nothing to redo"
            );
            return Ok(false);
        }
        self.step_to(self.pointer + 1, "redo")
    }

    fn step_to(&mut self, index: usize, op: &'static str) -> Result<bool, S::Error> {
        if let Err(e) = self.entries[index].restore() {
            tracing::warn!(
                target: TARGET,
                op,
                pointer = self.pointer,
                len = self.entries.len(),
                error = %e,
                "snapshot restore failed"
            );
            return Err(e);
        }
        self.pointer = index;

        tracing::debug!(
            target: TARGET,
            op,
            pointer = self.pointer,
            len = self.entries.len(),
            "snapshot restored"
        );
        Ok(true)
    }

    // ====================================================================
    // Query
    // ====================================================================

    /// Check if undo would move.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.pointer > 0
    }

    /// Check if redo would move.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.pointer + 1 < self.entries.len()
    }

    /// True when no snapshot has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of stored snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Index of the entry matching live state, `None` when empty.
    #[must_use]
    pub fn pointer(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.pointer)
    }

    /// The entry matching live state.
    #[must_use]
    pub fn current(&self) -> Option<&S> {
        self.entries.get(self.pointer)
    }

    /// Iterate over every stored snapshot, oldest first.
    pub fn iter(&self) -> slice::Iter<'_, S> {
        self.entries.iter()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    // ====================================================================
    // Maintenance
    // ====================================================================

    /// Drop every snapshot.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.pointer = 0;
        tracing::debug!(target: TARGET, op = "clear", dropped, "snapshots cleared");
    }

    /// Evict the oldest snapshots beyond `max_depth`. Returns how many went.
    fn enforce_depth(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.config.max_depth);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }
}

impl<'a, S> IntoIterator for &'a SnapshotHistory<S> {
    type Item = &'a S;
    type IntoIter = slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
