//! Error types for the rules engine.
//!
//! Rejected moves are ordinary, recoverable outcomes and are reported as
//! [`MoveRejection`]. Engine-level refusals (wrong turn, finished game,
//! search in flight) are [`EngineError`].

use crate::game_state::PlayerId;

/// Why a pawn move or wall placement was refused. The board is never
/// modified when one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveRejection {
    /// Destination (or jump landing) lies outside the board
    #[error("destination is off the board")]
    OutOfBounds,

    /// A wall sits between the pawn and its destination
    #[error("a wall blocks the way")]
    BlockedByWall,

    /// Diagonal move requested without an adjacent opponent whose straight jump is blocked
    #[error("no diagonal sidestep is available")]
    SidestepUnavailable,

    /// Requested destination cell is not reachable by any single pawn move
    #[error("pawn cannot reach that cell in one move")]
    Unreachable,

    /// At least one of the three wall slots is already taken
    #[error("wall slot already occupied")]
    OccupiedSlot,

    /// Placing the wall would leave the given player without a path to its goal row
    #[error("wall would cut player {0} off from its goal row")]
    WouldIsolate(PlayerId),

    /// Slot coordinates are not three consecutive, collinear wall slots
    #[error("malformed wall shape")]
    MalformedWall,

    /// The acting player has no walls left
    #[error("no walls left")]
    NoWallsLeft,
}

/// Errors surfaced by [`crate::engine::GameEngine`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("move rejected: {0}")]
    Rejected(#[from] MoveRejection),

    #[error("the game is already finished")]
    GameFinished,

    #[error("a computer move is still being computed")]
    SearchInFlight,

    #[error("it is not a human player's turn")]
    NotHumanTurn,

    #[error("it is not a computer player's turn")]
    NotComputerTurn,

    #[error("player {0} has no legal moves")]
    NoLegalMoves(PlayerId),

    #[error("search worker panicked")]
    SearchPanicked,
}

/// Errors building a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board size {0}: must be odd and at least 3")]
    InvalidSize(usize),
}

/// Error parsing a direction token such as `"up"` or `"down-left"`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
