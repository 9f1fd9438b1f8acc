#![forbid(unsafe_code)]

//! Display model for a visible history list.
//!
//! [`HistoryListing`] is a plain-data view of a
//! [`CommandHistory`](crate::CommandHistory): one [`HistoryEntry`] per stored
//! command, in chronological order, with the current position between the
//! last applied entry and the first redo entry. Hosts render it however
//! their toolkit likes; [`HistoryListing::lines`] gives a text rendering.
//!
//! ```text
//! ... (3 more)
//! ↶ Move node
//! ↶ Delete edge
//! ─── current ───
//! ↷ Rename node
//! ```

use crate::history::CommandHistory;

/// A single row in the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// Position in the history, oldest is 0.
    pub index: usize,
    /// Description of the command.
    pub description: String,
    /// Descriptions of the command's sub-operations.
    pub sub_commands: Vec<String>,
    /// Whether this entry sits in the redo branch.
    pub is_redo: bool,
}

/// How much of the history [`HistoryListing::lines`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryListingMode {
    /// Only the entries nearest the current position.
    #[default]
    Compact,
    /// Every entry.
    Full,
}

/// Chronological rows of a command history plus rendering options.
#[derive(Debug, Clone)]
pub struct HistoryListing {
    entries: Vec<HistoryEntry>,
    mode: HistoryListingMode,
    compact_limit: usize,
    marker_text: String,
    undo_icon: String,
    redo_icon: String,
}

impl HistoryListing {
    /// Snapshot the rows of `history`.
    #[must_use]
    pub fn from_history(history: &CommandHistory) -> Self {
        let cursor = history.cursor();
        let entries = history
            .iter()
            .enumerate()
            .map(|(index, cmd)| HistoryEntry {
                index,
                description: cmd.describe().to_string(),
                sub_commands: (0..cmd.sub_command_count())
                    .filter_map(|i| cmd.sub_command_description(i))
                    .map(str::to_string)
                    .collect(),
                is_redo: index >= cursor,
            })
            .collect();

        Self {
            entries,
            mode: HistoryListingMode::Compact,
            compact_limit: 10,
            marker_text: "─── current ───".to_string(),
            undo_icon: "↶ ".to_string(),
            redo_icon: "↷ ".to_string(),
        }
    }

    /// Set the display mode.
    #[must_use]
    pub fn with_mode(mut self, mode: HistoryListingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set how many rows compact mode shows around the marker.
    #[must_use]
    pub fn with_compact_limit(mut self, limit: usize) -> Self {
        self.compact_limit = limit;
        self
    }

    /// Set the marker text.
    #[must_use]
    pub fn with_marker_text(mut self, text: impl Into<String>) -> Self {
        self.marker_text = text.into();
        self
    }

    /// Set the undo and redo icon prefixes.
    #[must_use]
    pub fn with_icons(mut self, undo: impl Into<String>, redo: impl Into<String>) -> Self {
        self.undo_icon = undo.into();
        self.redo_icon = redo.into();
        self
    }

    /// All rows, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Rows that are currently applied.
    pub fn undo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(|e| !e.is_redo)
    }

    /// Rows in the redo branch.
    pub fn redo_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().filter(|e| e.is_redo)
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the history had no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the listing as text rows.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let split = self.entries.partition_point(|e| !e.is_redo);
        let (undo, redo) = self.entries.split_at(split);

        let (undo_shown, redo_shown) = match self.mode {
            HistoryListingMode::Compact => {
                let half = self.compact_limit / 2;
                let undo_start = undo.len().saturating_sub(half);
                let redo_end = half.min(redo.len());
                (&undo[undo_start..], &redo[..redo_end])
            }
            HistoryListingMode::Full => (undo, redo),
        };

        let mut lines = Vec::with_capacity(undo_shown.len() + redo_shown.len() + 3);
        if undo_shown.len() < undo.len() {
            lines.push(format!("... ({} more)", undo.len() - undo_shown.len()));
        }
        for entry in undo_shown {
            lines.push(format!("{}{}", self.undo_icon, entry.description));
        }
        lines.push(self.marker_text.clone());
        for entry in redo_shown {
            lines.push(format!("{}{}", self.redo_icon, entry.description));
        }
        if redo_shown.len() < redo.len() {
            lines.push(format!("... ({} more)", redo.len() - redo_shown.len()));
        }
        lines
    }
}
