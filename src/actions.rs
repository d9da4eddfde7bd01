use std::fmt;

use crate::game_state::{BoardState, PlayerId};
use crate::grid::{Coord, Wall, WallOrientation};
use crate::validation::{resolve_pawn_move, Direction};
use crate::walls::check_wall;

/// A legal action for the player to move: a pawn destination or a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Pawn(Coord),
    Wall(Wall),
}

impl Move {
    pub fn is_pawn(&self) -> bool {
        matches!(self, Move::Pawn(_))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Pawn((row, col)) => write!(f, "pawn to ({}, {})", row, col),
            Move::Wall(wall) => {
                let kind = match wall.orientation() {
                    WallOrientation::Horizontal => "horizontal",
                    WallOrientation::Vertical => "vertical",
                };
                let (row, col) = wall.center();
                write!(f, "{} wall at ({}, {})", kind, row, col)
            }
        }
    }
}

/// Get every pawn destination reachable by `player`, in [`Direction::ALL`]
/// order. Two requests never land on the same cell, so there are no
/// duplicates.
pub fn legal_pawn_moves(board: &BoardState, player: PlayerId) -> Vec<Coord> {
    Direction::ALL
        .into_iter()
        .filter_map(|direction| resolve_pawn_move(board, player, direction).ok())
        .collect()
}

/// Get every legal wall for `player`.
///
/// Intersections are visited row-major, horizontal before vertical. Returns an
/// empty list when the player has no walls left.
pub fn legal_wall_moves(board: &BoardState, player: PlayerId) -> Vec<Wall> {
    if board.player(player).walls_left == 0 {
        return Vec::new();
    }

    // Make a mutable copy of the board for in-place validation
    let mut scratch = board.clone();
    let dim = board.dim();
    let mut walls = Vec::new();

    for row in (1..dim).step_by(2) {
        for col in (1..dim).step_by(2) {
            for wall in [Wall::horizontal((row, col)), Wall::vertical((row, col))] {
                if check_wall(&mut scratch, player, &wall).is_ok() {
                    walls.push(wall);
                }
            }
        }
    }

    walls
}

/// All legal moves for `player`: pawn moves first, then walls.
pub fn legal_moves(board: &BoardState, player: PlayerId) -> Vec<Move> {
    let mut moves: Vec<Move> = legal_pawn_moves(board, player)
        .into_iter()
        .map(Move::Pawn)
        .collect();
    moves.extend(legal_wall_moves(board, player).into_iter().map(Move::Wall));
    moves
}

/// Apply a move produced by [`legal_moves`] without re-validating it.
pub fn apply_move(board: &mut BoardState, player: PlayerId, mv: &Move) {
    match mv {
        Move::Pawn(destination) => board.apply_pawn_move(player, *destination),
        Move::Wall(wall) => board.apply_wall(player, wall),
    }
}
