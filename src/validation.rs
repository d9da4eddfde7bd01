//! Pawn move legality: orthogonal steps, straight jumps over the opponent and
//! diagonal sidesteps when the straight jump is blocked.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView2;

use crate::error::{MoveRejection, ParseDirectionError};
use crate::game_state::{BoardState, PlayerId};
use crate::grid::{is_free, offset, Coord, CELL_FREE};

/// The eight pawn move requests. Rows grow downwards, so `Up` heads for row 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// Generation order: orthogonal moves first, then diagonals.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Unit step as `(dr, dc)`.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::UpLeft => (-1, -1),
            Direction::UpRight => (-1, 1),
            Direction::DownLeft => (1, -1),
            Direction::DownRight => (1, 1),
        }
    }

    pub fn is_diagonal(self) -> bool {
        match self {
            Direction::Up | Direction::Down | Direction::Left | Direction::Right => false,
            Direction::UpLeft | Direction::UpRight | Direction::DownLeft | Direction::DownRight => {
                true
            }
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::UpLeft => "up-left",
            Direction::UpRight => "up-right",
            Direction::DownLeft => "down-left",
            Direction::DownRight => "down-right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Direction {
    type Err = ParseDirectionError;

    /// Accepts `up`/`top`, `down`/`bottom`, `left`, `right` and their
    /// combinations, with or without a `-` or `_` separator and in any case
    /// (`topLeft`, `down-right`, `UP_LEFT`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        let normalized = normalized.replace("top", "up").replace("bottom", "down");
        match normalized.as_str() {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            "upleft" => Ok(Direction::UpLeft),
            "upright" => Ok(Direction::UpRight),
            "downleft" => Ok(Direction::DownLeft),
            "downright" => Ok(Direction::DownRight),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Work out where a pawn move request lands, without touching the board.
pub fn resolve_pawn_move(
    board: &BoardState,
    player: PlayerId,
    direction: Direction,
) -> Result<Coord, MoveRejection> {
    let grid = board.grid();
    let origin = board.player(player).position;
    let (dr, dc) = direction.delta();

    if direction.is_diagonal() {
        let opponent = board.player(player.opponent()).position;
        resolve_sidestep(&grid, origin, opponent, dr, dc)
    } else {
        resolve_orthogonal(&grid, origin, dr, dc)
    }
}

/// Resolve and apply a pawn move. The board is untouched on rejection.
pub fn try_pawn_move(
    board: &mut BoardState,
    player: PlayerId,
    direction: Direction,
) -> Result<Coord, MoveRejection> {
    let destination = resolve_pawn_move(board, player, direction)?;
    board.apply_pawn_move(player, destination);
    Ok(destination)
}

/// Find the request that moves `player` onto `destination`, if any.
pub fn direction_to(board: &BoardState, player: PlayerId, destination: Coord) -> Option<Direction> {
    Direction::ALL
        .into_iter()
        .find(|&direction| resolve_pawn_move(board, player, direction) == Ok(destination))
}

fn resolve_orthogonal(
    grid: &ArrayView2<i8>,
    origin: Coord,
    dr: isize,
    dc: isize,
) -> Result<Coord, MoveRejection> {
    let dim = grid.nrows();

    let destination = offset(origin, 2 * dr, 2 * dc, dim).ok_or(MoveRejection::OutOfBounds)?;
    let slot = offset(origin, dr, dc, dim).ok_or(MoveRejection::OutOfBounds)?;
    if !is_free(grid, slot) {
        return Err(MoveRejection::BlockedByWall);
    }
    if grid[destination] == CELL_FREE {
        return Ok(destination);
    }

    // Opponent in the way: jump straight over it
    let landing = offset(origin, 4 * dr, 4 * dc, dim).ok_or(MoveRejection::OutOfBounds)?;
    let beyond = offset(origin, 3 * dr, 3 * dc, dim).ok_or(MoveRejection::OutOfBounds)?;
    if !is_free(grid, beyond) {
        return Err(MoveRejection::BlockedByWall);
    }
    Ok(landing)
}

fn resolve_sidestep(
    grid: &ArrayView2<i8>,
    origin: Coord,
    opponent: Coord,
    dr: isize,
    dc: isize,
) -> Result<Coord, MoveRejection> {
    let dim = grid.nrows();
    let destination = offset(origin, 2 * dr, 2 * dc, dim).ok_or(MoveRejection::OutOfBounds)?;

    // Either the opponent is above/below and we step sideways around it, or it
    // is left/right and we step up/down around it
    let via_row = sidestep_along(grid, origin, opponent, (dr, 0), (0, dc));
    let via_col = sidestep_along(grid, origin, opponent, (0, dc), (dr, 0));

    if via_row || via_col {
        Ok(destination)
    } else {
        Err(MoveRejection::SidestepUnavailable)
    }
}

/// Sidestep check for one axis. `toward` points at the opponent, `aside` is
/// the sideways half of the diagonal.
fn sidestep_along(
    grid: &ArrayView2<i8>,
    origin: Coord,
    opponent: Coord,
    toward: (isize, isize),
    aside: (isize, isize),
) -> bool {
    let dim = grid.nrows();
    let (tr, tc) = toward;

    // Opponent two steps away along this axis
    if offset(origin, 2 * tr, 2 * tc, dim) != Some(opponent) {
        return false;
    }

    // Straight jump blocked by the board edge or a wall behind the opponent
    let jump_blocked = match (
        offset(origin, 3 * tr, 3 * tc, dim),
        offset(origin, 4 * tr, 4 * tc, dim),
    ) {
        (Some(beyond), Some(_)) => !is_free(grid, beyond),
        _ => true,
    };
    if !jump_blocked {
        return false;
    }

    // Slot between the opponent and the diagonal destination
    offset(opponent, aside.0, aside.1, dim).is_some_and(|slot| is_free(grid, slot))
}
