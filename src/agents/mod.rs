//! Move selection for computer-controlled players.
//!
//! All agents implement the [`MoveSelector`] trait.

use crate::actions::Move;
use crate::game_state::Snapshot;

pub mod random_agent;
pub mod search_agent;

pub use random_agent::RandomAgent;
pub use search_agent::SearchAgent;

/// Trait for agents that pick a move for the side to move in a snapshot.
pub trait MoveSelector {
    /// Select a legal move for `snapshot.active()`.
    ///
    /// Returns `None` when that player has no legal move.
    fn select_move(&mut self, snapshot: &Snapshot) -> Option<Move>;
}
