#![forbid(unsafe_code)]

//! The reversible-command capability and two built-in commands.
//!
//! A command is created by the host at the moment an edit is committed and is
//! then handed to [`CommandHistory::add`](crate::CommandHistory::add), which
//! takes exclusive ownership of it.
//!
//! # Invariants
//!
//! - `undo()` exactly reverses the command's effect on live state.
//! - `revert_to_snapshot()` reproduces the command's *post*-state. It is used
//!   on redo instead of re-running the forward logic.
//! - `sub_command_description(i)` is `Some` exactly for
//!   `i < sub_command_count()`.
//!
//! # Failure Modes
//!
//! - **Stale target**: the object a command edits was removed by something
//!   outside the history. The command should report
//!   [`CommandError::TargetNotFound`] and leave live state alone.
//! - **State drift**: live state changed behind the history's back. Report
//!   [`CommandError::StateDrift`].

use std::fmt;

use crate::error::{CommandError, CommandResult};

/// A reversible edit that a [`CommandHistory`](crate::CommandHistory) can
/// undo and redo.
pub trait Undoable {
    /// Human-readable description for menus and history lists.
    fn describe(&self) -> &str;

    /// Number of constituent sub-operations.
    fn sub_command_count(&self) -> usize {
        0
    }

    /// Description of sub-operation `index`, or `None` when out of range.
    fn sub_command_description(&self, _index: usize) -> Option<&str> {
        None
    }

    /// Reverse the command's effect on live state.
    fn undo(&mut self) -> CommandResult;

    /// Re-apply the command's recorded post-state.
    fn revert_to_snapshot(&mut self) -> CommandResult;
}

impl fmt::Debug for dyn Undoable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Undoable")
            .field("description", &self.describe())
            .field("sub_commands", &self.sub_command_count())
            .finish()
    }
}

/// Callback type for [`FnCommand`].
pub type CommandFn = Box<dyn FnMut() -> CommandResult>;

/// A command whose undo and redo steps are caller closures.
///
/// Useful when the edit is small enough that capturing the before/after
/// values in two closures is simpler than writing a dedicated type.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use rewind_history::{CommandHistory, FnCommand};
///
/// let zoom = Rc::new(Cell::new(100));
/// zoom.set(150);
///
/// let (z1, z2) = (zoom.clone(), zoom.clone());
/// let cmd = FnCommand::new("Zoom in")
///     .with_undo(move || {
///         z1.set(100);
///         Ok(())
///     })
///     .with_revert(move || {
///         z2.set(150);
///         Ok(())
///     });
///
/// let mut history = CommandHistory::default();
/// history.add(Box::new(cmd));
/// history.undo().unwrap();
/// assert_eq!(zoom.get(), 100);
/// ```
pub struct FnCommand {
    description: String,
    undo: Option<CommandFn>,
    revert: Option<CommandFn>,
}

impl fmt::Debug for FnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnCommand")
            .field("description", &self.description)
            .field("has_undo", &self.undo.is_some())
            .field("has_revert", &self.revert.is_some())
            .finish()
    }
}

impl FnCommand {
    /// Create a command with no callbacks yet.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            undo: None,
            revert: None,
        }
    }

    /// Set the undo callback.
    #[must_use]
    pub fn with_undo<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> CommandResult + 'static,
    {
        self.undo = Some(Box::new(f));
        self
    }

    /// Set the callback that re-applies the post-state.
    #[must_use]
    pub fn with_revert<F>(mut self, f: F) -> Self
    where
        F: FnMut() -> CommandResult + 'static,
    {
        self.revert = Some(Box::new(f));
        self
    }
}

impl Undoable for FnCommand {
    fn describe(&self) -> &str {
        &self.description
    }

    fn undo(&mut self) -> CommandResult {
        match self.undo.as_mut() {
            Some(undo) => undo(),
            None => Err(CommandError::InvalidState("no undo callback set".to_string())),
        }
    }

    fn revert_to_snapshot(&mut self) -> CommandResult {
        match self.revert.as_mut() {
            Some(revert) => revert(),
            None => Err(CommandError::InvalidState(
                "no revert callback set".to_string(),
            )),
        }
    }
}

/// Several commands recorded as one history entry.
///
/// Children are the batch's sub-commands. Undo walks them newest first and
/// redo walks them oldest first. When a child fails part way, the children
/// already handled in that call are rolled back so the batch is left either
/// fully applied or fully undone.
pub struct CommandBatch {
    /// Children in execution order.
    commands: Vec<Box<dyn Undoable>>,
    description: String,
}

impl fmt::Debug for CommandBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandBatch")
            .field("description", &self.description)
            .field("commands", &self.commands)
            .finish()
    }
}

impl CommandBatch {
    /// Create an empty batch.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            commands: Vec::new(),
            description: description.into(),
        }
    }

    /// Append an already-applied child.
    pub fn push(&mut self, cmd: Box<dyn Undoable>) {
        self.commands.push(cmd);
    }

    /// Builder form of [`push`](Self::push).
    #[must_use]
    pub fn with(mut self, cmd: Box<dyn Undoable>) -> Self {
        self.push(cmd);
        self
    }

    /// Number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// True when the batch has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Undoable for CommandBatch {
    fn describe(&self) -> &str {
        &self.description
    }

    fn sub_command_count(&self) -> usize {
        self.commands.len()
    }

    fn sub_command_description(&self, index: usize) -> Option<&str> {
        self.commands.get(index).map(|c| c.describe())
    }

    fn undo(&mut self) -> CommandResult {
        for i in (0..self.commands.len()).rev() {
            if let Err(e) = self.commands[i].undo() {
                // Re-apply the children this call already undid.
                for cmd in &mut self.commands[i + 1..] {
                    let _ = cmd.revert_to_snapshot();
                }
                return Err(e);
            }
        }
        Ok(())
    }

    fn revert_to_snapshot(&mut self) -> CommandResult {
        for i in 0..self.commands.len() {
            if let Err(e) = self.commands[i].revert_to_snapshot() {
                for cmd in self.commands[..i].iter_mut().rev() {
                    let _ = cmd.undo();
                }
                return Err(e);
            }
        }
        Ok(())
    }
}
