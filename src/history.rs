//! Undo/redo stacks of full board snapshots.

use tracing::debug;

use crate::game_state::{BoardState, Snapshot};

#[derive(Debug, Default, Clone)]
pub struct HistoryManager {
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the position before a move is attempted.
    pub fn save(&mut self, board: &BoardState) {
        self.undo_stack.push(board.snapshot());
    }

    /// Drop the most recent save. Used when the move it was taken for was
    /// rejected, so no phantom entry is left behind.
    pub fn discard_last(&mut self) {
        self.undo_stack.pop();
    }

    /// Forget redo history; any committed move invalidates it.
    pub fn clear_redo(&mut self) {
        self.redo_stack.clear();
    }

    /// Restore the previous position, pushing the current one to the redo
    /// stack. Returns `false` and leaves the board alone when there is nothing
    /// to undo.
    pub fn undo(&mut self, board: &mut BoardState) -> bool {
        let Some(previous) = self.undo_stack.pop() else {
            debug!("Nothing to undo");
            return false;
        };
        self.redo_stack.push(board.snapshot());
        board.restore(&previous);
        true
    }

    /// Mirror of [`HistoryManager::undo`].
    pub fn redo(&mut self, board: &mut BoardState) -> bool {
        let Some(next) = self.redo_stack.pop() else {
            debug!("Nothing to redo");
            return false;
        };
        self.undo_stack.push(board.snapshot());
        board.restore(&next);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }
}
