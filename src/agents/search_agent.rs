//! Minimax agent.

use crate::actions::Move;
use crate::agents::MoveSelector;
use crate::game_state::Snapshot;
use crate::minimax::{compute_move, SearchConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchAgent {
    config: SearchConfig,
}

impl SearchAgent {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

impl MoveSelector for SearchAgent {
    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move> {
        compute_move(snapshot, &self.config).map(|result| result.best_move)
    }
}
