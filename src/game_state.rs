//! Board state: the grid plus both players' records.
//!
//! [`BoardState`] only stores and mutates; it performs no legality checks.
//! Validation lives in [`crate::validation`] and [`crate::walls`].

use std::fmt;

use ndarray::{Array2, ArrayView2};

use crate::error::BoardError;
use crate::grid::{
    grid_dim, is_intersection, is_pawn_cell, mark_wall, Coord, Wall, CELL_FREE, CELL_PLAYER1,
    CELL_PLAYER2, WALL_HORIZONTAL, WALL_VERTICAL,
};

pub const DEFAULT_BOARD_SIZE: usize = 9;
pub const DEFAULT_WALLS_PER_PLAYER: u8 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const BOTH: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    /// Value stored in the pawn cell this player occupies.
    pub fn cell_value(self) -> i8 {
        match self {
            PlayerId::One => CELL_PLAYER1,
            PlayerId::Two => CELL_PLAYER2,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub position: Coord,
    pub walls_left: u8,
    pub goal_row: usize,
}

impl Player {
    pub fn has_won(&self) -> bool {
        self.position.0 == self.goal_row
    }
}

/// Deep copy of everything needed to restore or search a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    grid: Array2<i8>,
    players: [Player; 2],
    active: PlayerId,
}

impl Snapshot {
    pub fn grid(&self) -> ArrayView2<'_, i8> {
        self.grid.view()
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn active(&self) -> PlayerId {
        self.active
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardState {
    size: usize,
    grid: Array2<i8>,
    players: [Player; 2],
    active: PlayerId,
}

impl BoardState {
    /// Create the initial position: player 1 at the bottom centre heading for
    /// row 0, player 2 at the top centre heading for the last row.
    pub fn new(size: usize, walls_per_player: u8) -> Result<Self, BoardError> {
        if size < 3 || size % 2 == 0 {
            return Err(BoardError::InvalidSize(size));
        }
        let dim = grid_dim(size);
        let mut grid = Array2::<i8>::from_elem((dim, dim), CELL_FREE);

        let center_col = dim / 2;
        let players = [
            Player {
                id: PlayerId::One,
                position: (dim - 1, center_col),
                walls_left: walls_per_player,
                goal_row: 0,
            },
            Player {
                id: PlayerId::Two,
                position: (0, center_col),
                walls_left: walls_per_player,
                goal_row: dim - 1,
            },
        ];
        for player in &players {
            grid[player.position] = player.id.cell_value();
        }

        Ok(BoardState {
            size,
            grid,
            players,
            active: PlayerId::One,
        })
    }

    /// Rebuild an owned, independent board from a snapshot.
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let dim = snapshot.grid.nrows();
        BoardState {
            size: (dim + 1) / 2,
            grid: snapshot.grid.clone(),
            players: snapshot.players,
            active: snapshot.active,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid.clone(),
            players: self.players,
            active: self.active,
        }
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.grid = snapshot.grid.clone();
        self.size = (self.grid.nrows() + 1) / 2;
        self.players = snapshot.players;
        self.active = snapshot.active;
    }

    /// Pawn grid edge length.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Full grid edge length, `2 * size - 1`.
    pub fn dim(&self) -> usize {
        self.grid.nrows()
    }

    pub fn grid(&self) -> ArrayView2<'_, i8> {
        self.grid.view()
    }

    pub(crate) fn grid_mut(&mut self) -> &mut Array2<i8> {
        &mut self.grid
    }

    pub fn cell(&self, coord: Coord) -> i8 {
        self.grid[coord]
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.0 < self.dim() && coord.1 < self.dim()
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn active(&self) -> PlayerId {
        self.active
    }

    pub fn set_active(&mut self, id: PlayerId) {
        self.active = id;
    }

    pub fn has_won(&self, id: PlayerId) -> bool {
        self.player(id).has_won()
    }

    /// First player found standing on its goal row.
    pub fn winner(&self) -> Option<PlayerId> {
        PlayerId::BOTH.into_iter().find(|&id| self.has_won(id))
    }

    /// Move a pawn without checking legality.
    pub fn apply_pawn_move(&mut self, id: PlayerId, destination: Coord) {
        debug_assert!(is_pawn_cell(destination));
        let player = &mut self.players[id.index()];
        self.grid[player.position] = CELL_FREE;
        self.grid[destination] = id.cell_value();
        player.position = destination;
    }

    /// Commit a wall without checking legality.
    pub fn apply_wall(&mut self, id: PlayerId, wall: &Wall) {
        mark_wall(&mut self.grid.view_mut(), wall);
        let player = &mut self.players[id.index()];
        player.walls_left = player.walls_left.saturating_sub(1);
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row, line) in self.grid.rows().into_iter().enumerate() {
            for (col, &value) in line.iter().enumerate() {
                let coord = (row, col);
                let symbol = if is_pawn_cell(coord) {
                    match value {
                        CELL_PLAYER1 => '1',
                        CELL_PLAYER2 => '2',
                        _ => '.',
                    }
                } else if value == CELL_FREE {
                    ' '
                } else if is_intersection(coord) {
                    match value {
                        WALL_HORIZONTAL => '-',
                        WALL_VERTICAL => '|',
                        _ => '+',
                    }
                } else if row % 2 == 1 {
                    '-'
                } else {
                    '|'
                };
                write!(f, "{}", symbol)?;
            }
            writeln!(f)?;
        }
        for player in &self.players {
            writeln!(
                f,
                "P{}: {:?} walls left: {}",
                player.id, player.position, player.walls_left
            )?;
        }
        Ok(())
    }
}
