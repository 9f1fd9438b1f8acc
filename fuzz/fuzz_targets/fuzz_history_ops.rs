#![no_main]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rewind_history::{
    CommandError, CommandHistory, FnCommand, HistoryConfig, Restorable, SnapshotConfig,
    SnapshotHistory,
};

#[derive(Debug, Arbitrary)]
enum Op {
    Add(u8),
    AddFailing(u8),
    Undo,
    Redo,
    Clear,
}

#[derive(Debug, Arbitrary)]
struct Input {
    max_depth: u8,
    ops: Vec<Op>,
}

#[derive(Clone)]
struct Capture {
    value: u8,
    fail: bool,
    live: Rc<Cell<u8>>,
}

impl PartialEq for Capture {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Restorable for Capture {
    type Error = u8;

    fn restore(&self) -> Result<(), u8> {
        if self.fail {
            return Err(self.value);
        }
        self.live.set(self.value);
        Ok(())
    }
}

fuzz_target!(|input: Input| {
    // Cap length to keep fuzzing fast.
    if input.ops.len() > 512 {
        return;
    }
    let depth = match input.max_depth {
        0 => usize::MAX,
        d => usize::from(d),
    };

    let doc: Rc<RefCell<Vec<u8>>> = Rc::default();
    let mut commands = CommandHistory::new(HistoryConfig::new(depth));
    let live = Rc::new(Cell::new(0u8));
    let mut snapshots = SnapshotHistory::new(SnapshotConfig::new(depth));

    for op in &input.ops {
        match *op {
            Op::Add(v) | Op::AddFailing(v) => {
                let failing = matches!(op, Op::AddFailing(_));
                doc.borrow_mut().push(v);
                let (d1, d2) = (doc.clone(), doc.clone());
                commands.add(Box::new(
                    FnCommand::new(format!("push {v}"))
                        .with_undo(move || {
                            if failing {
                                return Err(CommandError::Other("refused".into()));
                            }
                            d1.borrow_mut().pop();
                            Ok(())
                        })
                        .with_revert(move || {
                            d2.borrow_mut().push(v);
                            Ok(())
                        }),
                ));

                live.set(v);
                snapshots.add_state(Capture {
                    value: v,
                    fail: failing,
                    live: live.clone(),
                });
                assert_eq!(commands.cursor(), commands.len());
                assert_eq!(snapshots.pointer(), snapshots.len().checked_sub(1));
            }
            Op::Undo => {
                let before = commands.cursor();
                match commands.undo() {
                    Ok(()) => assert_eq!(commands.cursor(), before - 1),
                    Err(_) => assert_eq!(commands.cursor(), before),
                }
                let before = snapshots.pointer();
                match snapshots.undo() {
                    Ok(true) => assert_eq!(snapshots.pointer(), before.map(|p| p - 1)),
                    Ok(false) | Err(_) => assert_eq!(snapshots.pointer(), before),
                }
            }
            Op::Redo => {
                let before = commands.cursor();
                match commands.redo() {
                    Ok(()) => assert_eq!(commands.cursor(), before + 1),
                    Err(_) => assert_eq!(commands.cursor(), before),
                }
                let before = snapshots.pointer();
                match snapshots.redo() {
                    Ok(true) => assert_eq!(snapshots.pointer(), before.map(|p| p + 1)),
                    Ok(false) | Err(_) => assert_eq!(snapshots.pointer(), before),
                }
            }
            Op::Clear => {
                commands.clear();
                snapshots.clear();
                doc.borrow_mut().clear();
            }
        }

        // Post-conditions that must always hold.
        assert!(commands.cursor() <= commands.len());
        assert!(commands.len() <= depth);
        assert_eq!(commands.undo_depth() + commands.redo_depth(), commands.len());
        assert_eq!(commands.iter().count(), commands.len());
        assert!(snapshots.len() <= depth);
        if let Some(pointer) = snapshots.pointer() {
            assert!(pointer < snapshots.len());
        } else {
            assert!(snapshots.is_empty());
        }
        let lines = commands.listing().lines();
        assert!(!lines.is_empty());
    }
});
