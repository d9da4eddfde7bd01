//! Random agent: picks a legal move uniformly at random.

use rand::seq::SliceRandom;

use crate::actions::{legal_moves, Move};
use crate::agents::MoveSelector;
use crate::game_state::{BoardState, Snapshot};

/// An agent that selects a random legal move.
pub struct RandomAgent {
    rng: rand::rngs::ThreadRng,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
        }
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl MoveSelector for RandomAgent {
    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move> {
        let board = BoardState::from_snapshot(snapshot);
        let moves = legal_moves(&board, board.active());
        moves.choose(&mut self.rng).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::PlayerId;

    #[test]
    fn test_random_agent_picks_legal_move() {
        let mut agent = RandomAgent::new();
        let mut board = BoardState::new(5, 2).unwrap();
        board.set_active(PlayerId::Two);
        let legal = legal_moves(&board, PlayerId::Two);

        for _ in 0..50 {
            let mv = agent.select_move(&board.snapshot()).unwrap();
            assert!(legal.contains(&mv), "RandomAgent picked an illegal move {}", mv);
        }
    }

    #[test]
    fn test_random_agent_without_walls_moves_pawn() {
        let mut agent = RandomAgent::new();
        let board = BoardState::new(5, 0).unwrap();
        for _ in 0..20 {
            assert!(agent.select_move(&board.snapshot()).unwrap().is_pawn());
        }
    }
}
