#![forbid(unsafe_code)]

//! Linear undo/redo histories for interactive editors.
//!
//! Two engines share one shape, an append-only sequence with a position that
//! truncates on divergence:
//!
//! - [`CommandHistory`] records discrete reversible commands
//!   ([`Undoable`]). Its cursor is a *count* of applied commands. Undo calls
//!   the command's own inverse; redo re-applies the command's recorded
//!   post-state.
//! - [`SnapshotHistory`] records whole-state captures ([`Restorable`]). Its
//!   pointer is the *index* of the entry matching live state. Undo and redo
//!   restore the neighbouring capture.
//!
//! # Choosing an Engine
//!
//! | Aspect | Commands | Snapshots |
//! |--------|----------|-----------|
//! | Storage | Small (only the change) | Full state per entry |
//! | Host work | Write an inverse per edit | Capture + restore |
//! | Adjacent duplicates | Kept | Collapsed by value equality |
//! | Navigating past an end | [`HistoryError`] | No-op (`Ok(false)`) |
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use rewind_history::{CommandHistory, FnCommand};
//!
//! let text = Rc::new(RefCell::new(String::from("hello")));
//!
//! // The host performs the edit, then records how to undo/redo it.
//! text.borrow_mut().push_str(" world");
//! let (t1, t2) = (text.clone(), text.clone());
//! let mut history = CommandHistory::default();
//! history.add(Box::new(
//!     FnCommand::new("Append")
//!         .with_undo(move || {
//!             t1.borrow_mut().truncate(5);
//!             Ok(())
//!         })
//!         .with_revert(move || {
//!             *t2.borrow_mut() = "hello world".into();
//!             Ok(())
//!         }),
//! ));
//!
//! if history.can_undo() {
//!     history.undo()?;
//! }
//! assert_eq!(*text.borrow(), "hello");
//! history.redo()?;
//! assert_eq!(*text.borrow(), "hello world");
//! # Ok::<(), rewind_history::HistoryError>(())
//! ```
//!
//! # Threading
//!
//! Both engines are single-threaded and synchronous. Neither trait requires
//! `Send`, so commands and snapshots may hold `Rc<RefCell<_>>` handles to
//! live state. Hosts that share a history across threads must serialize
//! access to it and to the live state together.
//!
//! # Logging
//!
//! Every transition emits a `tracing` event with target `rewind.history` or
//! `rewind.snapshot`. The crate never installs a subscriber.

pub mod command;
#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod history;
pub mod listing;
pub mod snapshot;

pub use command::{CommandBatch, CommandFn, FnCommand, Undoable};
#[cfg(feature = "config")]
pub use config::{ConfigError, RewindConfig};
pub use error::{CommandError, CommandResult, HistoryError};
pub use history::{CommandHistory, Entries, HistoryConfig};
pub use listing::{HistoryEntry, HistoryListing, HistoryListingMode};
pub use snapshot::{Restorable, SnapshotConfig, SnapshotHistory};
