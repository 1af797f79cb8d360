use tracing::debug;

use crate::commands::{Command, CommandSummary};

/// Execution history plus undo/redo bookkeeping.
///
/// Every executed command lands in the append-only history, failed ones
/// included; the undo and redo stacks hold indices into it. The stacks are
/// kept uniformly: an undo always moves the popped entry to the redo stack,
/// whether or not the command's own undo had any effect.
#[derive(Default)]
pub struct Journal {
    history: Vec<Command>,
    undo_stack: Vec<usize>,
    redo_stack: Vec<usize>,
}

impl Journal {
    pub fn new() -> Journal {
        Journal {
            history: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Executes the command and records it. A new execution invalidates any
    /// previously undone commands, so the redo stack is emptied.
    pub fn execute(&mut self, mut command: Command) -> usize {
        command.execute();
        let index = self.history.len();
        debug!(entry = index, command = %command.summary(), "command recorded");
        self.history.push(command);
        self.undo_stack.push(index);
        self.redo_stack.clear();
        index
    }

    /// Undoes the most recently executed command, moving it to the redo
    /// stack. Nothing to undo is a logged no-op.
    pub fn undo_last(&mut self) {
        match self.undo_stack.pop() {
            Some(index) => {
                debug!(entry = index, "undoing last command");
                self.history[index].undo();
                self.redo_stack.push(index);
            }
            None => debug!("no commands to undo"),
        }
    }

    /// Re-executes the most recently undone command, moving it back to the
    /// undo stack. Nothing to redo is a logged no-op.
    pub fn redo_last(&mut self) {
        match self.redo_stack.pop() {
            Some(index) => {
                debug!(entry = index, "redoing last undone command");
                self.history[index].execute();
                self.undo_stack.push(index);
            }
            None => debug!("no commands to redo"),
        }
    }

    /// Snapshot of the full history, oldest first. The returned summaries
    /// are detached from the journal; mutating them changes nothing here.
    pub fn history(&self) -> Vec<CommandSummary> {
        self.history.iter().map(Command::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn undoable(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redoable(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.history.clear();
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!("journal cleared");
    }
}
