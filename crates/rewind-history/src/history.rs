#![forbid(unsafe_code)]

//! Linear command history with a cursor.
//!
//! [`CommandHistory`] stores every recorded command in one `Vec` and keeps a
//! cursor that counts how many of them are currently applied to live state.
//!
//! # Invariants
//!
//! 1. `0 <= cursor <= entries.len()` after any operation.
//! 2. Entries `[0, cursor)` are applied; entries `[cursor, len)` are the redo
//!    branch.
//! 3. `add` discards the redo branch, then appends: afterwards
//!    `cursor == entries.len()`.
//! 4. The cursor moves only after the command's own call returned `Ok`.
//!
//! # Memory Model
//!
//! ```text
//! add(c1) add(c2) add(c3)
//! ┌─────────────────────────────────────┐
//! │ entries: [c1, c2, c3]   cursor: 3   │
//! └─────────────────────────────────────┘
//!
//! undo() x2
//! ┌─────────────────────────────────────┐
//! │ entries: [c1, c2, c3]   cursor: 1   │
//! │              └──┴── redo branch     │
//! └─────────────────────────────────────┘
//!
//! add(c4)  <-- diverges, drops c2 and c3
//! ┌─────────────────────────────────────┐
//! │ entries: [c1, c4]       cursor: 2   │
//! └─────────────────────────────────────┘
//! ```

use std::fmt;
use std::iter::FusedIterator;
use std::slice;

use crate::command::Undoable;
use crate::error::HistoryError;
use crate::listing::HistoryListing;

const TARGET: &str = "rewind.history";

/// Configuration for a [`CommandHistory`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct HistoryConfig {
    /// Maximum number of stored commands. Oldest commands are evicted
    /// when an `add` exceeds it.
    #[cfg_attr(
        feature = "config",
        serde(skip_serializing_if = "crate::history::is_unbounded")
    )]
    pub max_depth: usize,
}

/// Unbounded depth is written as an absent key; TOML integers stop at
/// `i64::MAX`.
#[cfg(feature = "config")]
pub(crate) fn is_unbounded(max_depth: &usize) -> bool {
    *max_depth == usize::MAX
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl HistoryConfig {
    /// Create a configuration with a depth bound.
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }

    /// No bound: entries are only ever removed by truncation.
    #[must_use]
    pub fn unlimited() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// Linear undo/redo stack of caller-supplied commands.
pub struct CommandHistory {
    /// Every recorded command, oldest first.
    entries: Vec<Box<dyn Undoable>>,
    /// Number of entries currently applied.
    cursor: usize,
    config: HistoryConfig,
}

impl fmt::Debug for CommandHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHistory")
            .field("len", &self.entries.len())
            .field("cursor", &self.cursor)
            .field("config", &self.config)
            .finish()
    }
}

impl Default for CommandHistory {
    fn default() -> Self {
        Self::new(HistoryConfig::default())
    }
}

impl CommandHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new(config: HistoryConfig) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            config,
        }
    }

    // ========================================================================
    // Core Operations
    // ========================================================================

    /// Record a command that has already been applied to live state.
    ///
    /// Any redo branch is discarded first. Never fails.
    pub fn add(&mut self, command: Box<dyn Undoable>) {
        let truncated = self.entries.len() - self.cursor;
        self.entries.truncate(self.cursor);
        self.entries.push(command);
        self.cursor = self.entries.len();
        let evicted = self.enforce_depth();

        tracing::debug!(
            target: TARGET,
            op = "add",
            cursor = self.cursor,
            len = self.entries.len(),
            truncated,
            evicted,
            "command recorded"
        );
    }

    /// Undo the most recently applied command.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::NothingToUndo`] if [`can_undo`](Self::can_undo) is
    ///   false. Nothing changes.
    /// - [`HistoryError::Command`] if the command's `undo` failed. The cursor
    ///   stays where it was.
    pub fn undo(&mut self) -> Result<(), HistoryError> {
        let _span = tracing::debug_span!("history.undo", cursor = self.cursor).entered();

        if !self.can_undo() {
            let err = HistoryError::NothingToUndo {
                cursor: self.cursor,
                len: self.entries.len(),
            };
            tracing::warn!(
                target: TARGET,
                op = "undo",
                cursor = self.cursor,
                len = self.entries.len(),
                error = %err,
                "undo rejected"
            );
            return Err(err);
        }

        let index = self.cursor - 1;
        if let Err(e) = self.entries[index].undo() {
            tracing::warn!(
                target: TARGET,
                op = "undo",
                cursor = self.cursor,
                len = self.entries.len(),
                error = %e,
                "command undo failed"
            );
            return Err(e.into());
        }
        self.cursor = index;

        tracing::debug!(
            target: TARGET,
            op = "undo",
            cursor = self.cursor,
            len = self.entries.len(),
            "command undone"
        );
        Ok(())
    }

    /// Redo the next command in the redo branch by re-applying its
    /// recorded post-state.
    ///
    /// # Errors
    ///
    /// - [`HistoryError::NothingToRedo`] if [`can_redo`](Self::can_redo) is
    ///   false. Nothing changes.
    /// - [`HistoryError::Command`] if the command's `revert_to_snapshot`
    ///   failed. The cursor stays where it was.
    pub fn redo(&mut self) -> Result<(), HistoryError> {
        let _span = tracing::debug_span!("history.redo", cursor = self.cursor).entered();

        if !self.can_redo() {
            let err = HistoryError::NothingToRedo {
                cursor: self.cursor,
                len: self.entries.len(),
            };
            tracing::warn!(
                target: TARGET,
                op = "redo",
                cursor = self.cursor,
                len = self.entries.len(),
                error = %err,
                "redo rejected"
            );
            return Err(err);
        }

        if let Err(e) = self.entries[self.cursor].revert_to_snapshot() {
            tracing::warn!(
                target: TARGET,
                op = "redo",
                cursor = self.cursor,
                len = self.entries.len(),
                error = %e,
                "command redo failed"
            );
            return Err(e.into());
        }
        self.cursor += 1;

        tracing::debug!(
            target: TARGET,
            op = "redo",
            cursor = self.cursor,
            len = self.entries.len(),
            "command redone"
        );
        Ok(())
    }

    /// Check if undo is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if redo is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Number of stored commands, applied and redo branch alike.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of commands currently applied.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// How many times `undo` can succeed in a row.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// How many times `redo` can succeed in a row.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.entries.len() - self.cursor
    }

    /// Description of the command `undo` would reverse.
    #[must_use]
    pub fn next_undo_description(&self) -> Option<&str> {
        self.cursor
            .checked_sub(1)
            .map(|i| self.entries[i].describe())
    }

    /// Description of the command `redo` would re-apply.
    #[must_use]
    pub fn next_redo_description(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|c| c.describe())
    }

    /// Descriptions of applied commands, most recent first.
    pub fn undo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.entries[..self.cursor]
            .iter()
            .rev()
            .take(limit)
            .map(|c| c.describe())
            .collect()
    }

    /// Descriptions of redo-branch commands, next redo first.
    pub fn redo_descriptions(&self, limit: usize) -> Vec<&str> {
        self.entries[self.cursor..]
            .iter()
            .take(limit)
            .map(|c| c.describe())
            .collect()
    }

    /// Iterate over every stored command in chronological order.
    pub fn iter(&self) -> Entries<'_> {
        Entries {
            inner: self.entries.iter(),
        }
    }

    /// Build a display model of the history for a visible history list.
    #[must_use]
    pub fn listing(&self) -> HistoryListing {
        HistoryListing::from_history(self)
    }

    /// Get the current configuration.
    #[must_use]
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    /// Drop every recorded command.
    pub fn clear(&mut self) {
        let dropped = self.entries.len();
        self.entries.clear();
        self.cursor = 0;
        tracing::debug!(target: TARGET, op = "clear", dropped, "history cleared");
    }

    /// Evict the oldest commands beyond `max_depth`. Returns how many went.
    fn enforce_depth(&mut self) -> usize {
        let excess = self.entries.len().saturating_sub(self.config.max_depth);
        if excess > 0 {
            self.entries.drain(..excess);
            self.cursor = self.cursor.saturating_sub(excess);
        }
        excess
    }
}

impl<'a> IntoIterator for &'a CommandHistory {
    type Item = &'a dyn Undoable;
    type IntoIter = Entries<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Read-only iterator over a [`CommandHistory`]'s commands, oldest first.
#[derive(Clone)]
pub struct Entries<'a> {
    inner: slice::Iter<'a, Box<dyn Undoable>>,
}

impl fmt::Debug for Entries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = &'a dyn Undoable;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|c| &**c)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Entries<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|c| &**c)
    }
}

impl ExactSizeIterator for Entries<'_> {}

impl FusedIterator for Entries<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FnCommand;
    use crate::error::CommandError;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// A command that records its calls in a shared log.
    fn make_cmd(name: &str, log: &Log) -> Box<dyn Undoable> {
        let (l1, l2) = (log.clone(), log.clone());
        let (n1, n2) = (name.to_string(), name.to_string());
        Box::new(
            FnCommand::new(name)
                .with_undo(move || {
                    l1.borrow_mut().push(format!("undo {n1}"));
                    Ok(())
                })
                .with_revert(move || {
                    l2.borrow_mut().push(format!("revert {n2}"));
                    Ok(())
                }),
        )
    }

    fn names(history: &CommandHistory) -> Vec<&str> {
        history.iter().map(|c| c.describe()).collect()
    }

    #[test]
    fn new_history_is_empty() {
        let history = CommandHistory::default();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.cursor(), 0);
        assert_eq!(history.iter().count(), 0);
    }

    #[test]
    fn add_enables_undo_not_redo() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));

        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn undo_calls_command_undo_and_moves_cursor() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));
        history.add(make_cmd("c2", &log));

        history.undo().unwrap();
        assert_eq!(history.cursor(), 1);
        assert_eq!(*log.borrow(), ["undo c2"]);
        assert!(history.can_redo());
    }

    #[test]
    fn divergence_discards_redo_branch() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));
        history.add(make_cmd("c2", &log));
        history.add(make_cmd("c3", &log));

        history.undo().unwrap();
        history.undo().unwrap();
        assert_eq!(history.cursor(), 1);

        history.add(make_cmd("c4", &log));
        assert_eq!(names(&history), ["c1", "c4"]);
        assert_eq!(history.cursor(), 2);
        assert!(!history.can_redo());
    }

    #[test]
    fn redo_replays_recorded_post_state_in_order() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));
        history.add(make_cmd("c2", &log));
        history.add(make_cmd("c3", &log));
        history.undo().unwrap();
        history.undo().unwrap();
        log.borrow_mut().clear();

        history.redo().unwrap();
        assert_eq!(history.cursor(), 2);
        history.redo().unwrap();
        assert_eq!(history.cursor(), 3);
        assert_eq!(*log.borrow(), ["revert c2", "revert c3"]);
    }

    #[test]
    fn undo_on_empty_is_out_of_range() {
        let mut history = CommandHistory::default();
        let err = history.undo().unwrap_err();
        assert_eq!(err, HistoryError::NothingToUndo { cursor: 0, len: 0 });
        assert_eq!(history.cursor(), 0);
    }

    #[test]
    fn redo_at_end_is_out_of_range() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));

        let err = history.redo().unwrap_err();
        assert_eq!(err, HistoryError::NothingToRedo { cursor: 1, len: 1 });
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn failing_undo_keeps_cursor() {
        let mut history = CommandHistory::default();
        history.add(Box::new(
            FnCommand::new("broken")
                .with_undo(|| Err(CommandError::TargetNotFound("node 7".into()))),
        ));

        let err = history.undo().unwrap_err();
        assert_eq!(
            err,
            HistoryError::Command(CommandError::TargetNotFound("node 7".into()))
        );
        assert_eq!(history.cursor(), 1);
        assert!(history.can_undo());
    }

    #[test]
    fn failing_redo_keeps_cursor() {
        let mut history = CommandHistory::default();
        history.add(Box::new(
            FnCommand::new("broken")
                .with_undo(|| Ok(()))
                .with_revert(|| Err(CommandError::Other("gone".into()))),
        ));
        history.undo().unwrap();

        let err = history.redo().unwrap_err();
        assert_eq!(err, HistoryError::Command(CommandError::Other("gone".into())));
        assert_eq!(history.cursor(), 0);
        assert!(history.can_redo());
    }

    #[test]
    fn queries_do_not_mutate() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("c1", &log));
        history.add(make_cmd("c2", &log));
        history.undo().unwrap();

        for _ in 0..3 {
            assert!(history.can_undo());
            assert!(history.can_redo());
        }
        assert_eq!(history.cursor(), 1);
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn iteration_covers_applied_and_redo_entries() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        for name in ["a", "b", "c"] {
            history.add(make_cmd(name, &log));
        }
        history.undo().unwrap();

        assert_eq!(names(&history), ["a", "b", "c"]);
        // Restartable.
        assert_eq!(names(&history), ["a", "b", "c"]);
        let rev: Vec<_> = history.iter().rev().map(|c| c.describe()).collect();
        assert_eq!(rev, ["c", "b", "a"]);
        assert_eq!(history.iter().len(), 3);

        let mut seen = 0;
        for cmd in &history {
            assert!(!cmd.describe().is_empty());
            seen += 1;
        }
        assert_eq!(seen, 3);
    }

    #[test]
    fn descriptions() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        for name in ["a", "b", "c", "d"] {
            history.add(make_cmd(name, &log));
        }
        history.undo().unwrap();
        history.undo().unwrap();

        assert_eq!(history.undo_descriptions(5), ["b", "a"]);
        assert_eq!(history.undo_descriptions(1), ["b"]);
        assert_eq!(history.redo_descriptions(5), ["c", "d"]);
        assert_eq!(history.next_undo_description(), Some("b"));
        assert_eq!(history.next_redo_description(), Some("c"));
        assert_eq!(history.undo_depth(), 2);
        assert_eq!(history.redo_depth(), 2);
    }

    #[test]
    fn next_descriptions_at_edges() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        assert_eq!(history.next_undo_description(), None);
        assert_eq!(history.next_redo_description(), None);

        history.add(make_cmd("only", &log));
        assert_eq!(history.next_undo_description(), Some("only"));
        assert_eq!(history.next_redo_description(), None);

        history.undo().unwrap();
        assert_eq!(history.next_undo_description(), None);
        assert_eq!(history.next_redo_description(), Some("only"));
    }

    #[test]
    fn clear_drops_everything() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("a", &log));
        history.add(make_cmd("b", &log));
        history.undo().unwrap();

        history.clear();
        assert!(history.is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn max_depth_evicts_oldest() {
        let log = Log::default();
        let mut history = CommandHistory::new(HistoryConfig::new(3));
        for name in ["a", "b", "c", "d", "e"] {
            history.add(make_cmd(name, &log));
        }

        assert_eq!(names(&history), ["c", "d", "e"]);
        assert_eq!(history.cursor(), 3);
    }

    #[test]
    fn max_depth_after_undo_keeps_cursor_at_end() {
        let log = Log::default();
        let mut history = CommandHistory::new(HistoryConfig::new(2));
        history.add(make_cmd("a", &log));
        history.add(make_cmd("b", &log));
        history.undo().unwrap();
        history.add(make_cmd("c", &log));
        history.add(make_cmd("d", &log));

        assert_eq!(names(&history), ["c", "d"]);
        assert_eq!(history.cursor(), 2);
    }

    #[test]
    fn config_default_is_unlimited() {
        assert_eq!(HistoryConfig::default().max_depth, usize::MAX);
        assert_eq!(HistoryConfig::new(7).max_depth, 7);
        let history = CommandHistory::new(HistoryConfig::new(42));
        assert_eq!(history.config().max_depth, 42);
    }

    #[test]
    fn debug_impls() {
        let log = Log::default();
        let mut history = CommandHistory::default();
        history.add(make_cmd("a", &log));
        let s = format!("{history:?}");
        assert!(s.contains("CommandHistory"));
        assert!(s.contains("cursor"));
        let s = format!("{:?}", history.iter());
        assert!(s.contains("remaining: 1"));
    }
}
