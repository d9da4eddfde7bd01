//! Quoridor rules engine with wall connectivity checks and minimax search.
//!
//! The board is an `ndarray` grid of side `2 * size - 1`: pawn cells at even
//! coordinates, wall slots in between. [`engine::GameEngine`] sequences turns
//! and history on top of the rules in [`validation`] and [`walls`], and hands
//! computer turns to [`minimax`].

pub mod actions;
pub mod agents;
pub mod config;
pub mod engine;
pub mod error;
pub mod game_state;
pub mod grid;
pub mod history;
pub mod minimax;
pub mod pathfinding;
pub mod validation;
pub mod walls;

pub use actions::Move;
pub use engine::{ComputerTurns, Controller, GameEngine, SearchTask, TurnState};
pub use error::{BoardError, EngineError, EngineResult, MoveRejection};
pub use game_state::{BoardState, PlayerId, Snapshot};
pub use grid::{Coord, Wall, WallOrientation};
pub use minimax::{compute_move, compute_move_with, SearchConfig, SearchResult};
pub use validation::Direction;
