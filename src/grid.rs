//! Grid geometry: cell classification, wall shapes and wall cell helpers.
//!
//! The grid has side `2 * size - 1`. Cells with two even indices hold pawns,
//! cells with exactly one odd index are edge slots between two pawn cells, and
//! cells with two odd indices are intersections where two edge slots meet.

use ndarray::{ArrayView2, ArrayViewMut2};

use crate::error::MoveRejection;

/// `(row, col)` on the full grid.
pub type Coord = (usize, usize);

// Cell values
pub const CELL_FREE: i8 = 0;
pub const CELL_PLAYER1: i8 = 1;
pub const CELL_PLAYER2: i8 = 2;
pub const CELL_WALL: i8 = 1;

// Orientation codes written to the centre slot of a committed wall
pub const WALL_HORIZONTAL: i8 = 1;
pub const WALL_VERTICAL: i8 = 2;

/// Grid side length for a pawn grid of `size` x `size`.
pub fn grid_dim(size: usize) -> usize {
    2 * size - 1
}

pub fn is_pawn_cell(coord: Coord) -> bool {
    coord.0 % 2 == 0 && coord.1 % 2 == 0
}

/// Slot between two orthogonally adjacent pawn cells.
pub fn is_edge_slot(coord: Coord) -> bool {
    (coord.0 % 2 == 1) != (coord.1 % 2 == 1)
}

pub fn is_intersection(coord: Coord) -> bool {
    coord.0 % 2 == 1 && coord.1 % 2 == 1
}

/// Shift `coord` by `(dr, dc)`, returning `None` when the result leaves a
/// `dim` x `dim` grid.
pub fn offset(coord: Coord, dr: isize, dc: isize, dim: usize) -> Option<Coord> {
    let row = coord.0.checked_add_signed(dr)?;
    let col = coord.1.checked_add_signed(dc)?;
    (row < dim && col < dim).then_some((row, col))
}

/// True when `coord` is on the grid and holds nothing.
pub fn is_free(grid: &ArrayView2<i8>, coord: Coord) -> bool {
    coord.0 < grid.nrows() && coord.1 < grid.ncols() && grid[coord] == CELL_FREE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallOrientation {
    Horizontal,
    Vertical,
}

impl WallOrientation {
    pub fn code(self) -> i8 {
        match self {
            WallOrientation::Horizontal => WALL_HORIZONTAL,
            WallOrientation::Vertical => WALL_VERTICAL,
        }
    }

    /// Unit step along the wall, as `(dr, dc)`.
    fn along(self) -> (isize, isize) {
        match self {
            WallOrientation::Horizontal => (0, 1),
            WallOrientation::Vertical => (1, 0),
        }
    }
}

/// A wall: endpoint edge slot, centre intersection, endpoint edge slot.
///
/// Slots are stored in ascending order so two requests for the same wall
/// compare equal regardless of which endpoint was given first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Wall {
    slots: [Coord; 3],
    orientation: WallOrientation,
}

impl Wall {
    /// Horizontal wall centred on an intersection. The caller guarantees the
    /// centre is an intersection inside the grid.
    pub fn horizontal(center: Coord) -> Self {
        Wall {
            slots: [(center.0, center.1 - 1), center, (center.0, center.1 + 1)],
            orientation: WallOrientation::Horizontal,
        }
    }

    /// Vertical wall centred on an intersection.
    pub fn vertical(center: Coord) -> Self {
        Wall {
            slots: [(center.0 - 1, center.1), center, (center.0 + 1, center.1)],
            orientation: WallOrientation::Vertical,
        }
    }

    /// Build a wall from three slot coordinates given as endpoint, centre,
    /// endpoint. The orientation is horizontal when the endpoints share a row.
    pub fn from_slots(slots: [Coord; 3], dim: usize) -> Result<Self, MoveRejection> {
        let [first, center, last] = slots;
        if slots.iter().any(|&(r, c)| r >= dim || c >= dim) {
            return Err(MoveRejection::MalformedWall);
        }
        if !is_intersection(center) || !is_edge_slot(first) || !is_edge_slot(last) {
            return Err(MoveRejection::MalformedWall);
        }

        let wall = if first.0 == last.0 && center.0 == first.0 {
            Wall::horizontal(center)
        } else if first.1 == last.1 && center.1 == first.1 {
            Wall::vertical(center)
        } else {
            return Err(MoveRejection::MalformedWall);
        };

        // Endpoints must sit exactly one slot either side of the centre
        let [lo, _, hi] = wall.slots;
        let given = if first <= last { (first, last) } else { (last, first) };
        if given != (lo, hi) {
            return Err(MoveRejection::MalformedWall);
        }
        Ok(wall)
    }

    /// Build a wall from its two endpoints, deriving the centre. Endpoints must
    /// be collinear and exactly two cells apart.
    pub fn between(anchor: Coord, end: Coord, dim: usize) -> Result<Self, MoveRejection> {
        let center = if anchor.0 == end.0 && anchor.1.abs_diff(end.1) == 2 {
            (anchor.0, anchor.1.min(end.1) + 1)
        } else if anchor.1 == end.1 && anchor.0.abs_diff(end.0) == 2 {
            (anchor.0.min(end.0) + 1, anchor.1)
        } else {
            return Err(MoveRejection::MalformedWall);
        };
        Wall::from_slots([anchor, center, end], dim)
    }

    pub fn slots(&self) -> [Coord; 3] {
        self.slots
    }

    pub fn center(&self) -> Coord {
        self.slots[1]
    }

    pub fn orientation(&self) -> WallOrientation {
        self.orientation
    }
}

/// Check that all three slots of the wall are free.
pub fn are_wall_cells_free(grid: &ArrayView2<i8>, wall: &Wall) -> bool {
    wall.slots.iter().all(|&slot| is_free(grid, slot))
}

/// Set all three slots of the wall to `cell_value`.
pub fn set_wall_cells(grid: &mut ArrayViewMut2<i8>, wall: &Wall, cell_value: i8) {
    for slot in wall.slots {
        grid[slot] = cell_value;
    }
}

/// Write a committed wall: endpoints get [`CELL_WALL`], the centre gets the
/// orientation code.
pub fn mark_wall(grid: &mut ArrayViewMut2<i8>, wall: &Wall) {
    set_wall_cells(grid, wall, CELL_WALL);
    grid[wall.center()] = wall.orientation.code();
}

/// Check if a wall placement could cut a player's path.
///
/// A new wall can only close off a region when it touches the board edge or
/// other walls in at least two places (either end, or its middle). Walls that
/// touch in fewer places never need a reachability search.
pub fn could_disconnect(grid: &ArrayView2<i8>, wall: &Wall) -> bool {
    let dim = grid.nrows();
    let (ar, ac) = wall.orientation.along();
    let center = wall.center();

    // (along, across) relative to the centre, in the wall's own frame
    let at = |along: isize, across: isize| {
        offset(center, along * ar + across * ac, along * ac + across * ar, dim)
    };
    let occupied =
        |along: isize, across: isize| at(along, across).is_some_and(|c| grid[c] != CELL_FREE);

    let end_touches = |sign: isize| {
        at(2 * sign, 0).is_none()
            || occupied(2 * sign, -1)
            || occupied(2 * sign, 1)
            || occupied(3 * sign, 0)
    };

    let mut touches = 0;
    if end_touches(-1) {
        touches += 1;
    }
    if occupied(0, -1) || occupied(0, 1) {
        touches += 1;
    }
    if end_touches(1) {
        touches += 1;
    }

    touches >= 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;

    fn empty_grid(size: usize) -> Array2<i8> {
        let dim = grid_dim(size);
        Array2::<i8>::from_elem((dim, dim), CELL_FREE)
    }

    #[test]
    fn test_cell_classification() {
        assert!(is_pawn_cell((0, 0)));
        assert!(is_pawn_cell((16, 8)));
        assert!(is_edge_slot((1, 0)));
        assert!(is_edge_slot((0, 1)));
        assert!(is_intersection((1, 1)));
        assert!(!is_edge_slot((1, 1)));
        assert!(!is_pawn_cell((1, 2)));
    }

    #[test]
    fn test_offset_bounds() {
        assert_eq!(offset((0, 0), -1, 0, 9), None);
        assert_eq!(offset((8, 8), 1, 0, 9), None);
        assert_eq!(offset((4, 4), -2, 2, 9), Some((2, 6)));
    }

    #[test]
    fn test_wall_from_slots_orientation() {
        let wall = Wall::from_slots([(1, 0), (1, 1), (1, 2)], 9).unwrap();
        assert_eq!(wall.orientation(), WallOrientation::Horizontal);
        assert_eq!(wall.center(), (1, 1));

        let wall = Wall::from_slots([(2, 3), (3, 3), (4, 3)], 9).unwrap();
        assert_eq!(wall.orientation(), WallOrientation::Vertical);
    }

    #[test]
    fn test_wall_from_slots_reversed_endpoints_are_equal() {
        let a = Wall::from_slots([(1, 0), (1, 1), (1, 2)], 9).unwrap();
        let b = Wall::from_slots([(1, 2), (1, 1), (1, 0)], 9).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_wall_from_slots_malformed() {
        // Not collinear
        assert_eq!(
            Wall::from_slots([(1, 0), (1, 1), (2, 1)], 9),
            Err(MoveRejection::MalformedWall)
        );
        // Centre is a pawn cell
        assert_eq!(
            Wall::from_slots([(0, 1), (0, 2), (0, 3)], 9),
            Err(MoveRejection::MalformedWall)
        );
        // Too far apart
        assert_eq!(
            Wall::from_slots([(1, 0), (1, 1), (1, 4)], 9),
            Err(MoveRejection::MalformedWall)
        );
        // Off the grid
        assert_eq!(
            Wall::from_slots([(1, 8), (1, 9), (1, 10)], 9),
            Err(MoveRejection::MalformedWall)
        );
    }

    #[test]
    fn test_wall_between_derives_center() {
        let wall = Wall::between((4, 3), (2, 3), 9).unwrap();
        assert_eq!(wall.center(), (3, 3));
        assert_eq!(wall.orientation(), WallOrientation::Vertical);

        // Endpoints two apart but centre lands on a pawn cell
        assert_eq!(
            Wall::between((3, 4), (1, 4), 9),
            Err(MoveRejection::MalformedWall)
        );

        assert_eq!(
            Wall::between((1, 0), (1, 4), 9),
            Err(MoveRejection::MalformedWall)
        );
    }

    #[test]
    fn test_set_and_mark_wall_cells() {
        let mut grid = empty_grid(5);
        let wall = Wall::horizontal((1, 3));
        assert!(are_wall_cells_free(&grid.view(), &wall));

        mark_wall(&mut grid.view_mut(), &wall);
        assert_eq!(grid[[1, 2]], CELL_WALL);
        assert_eq!(grid[[1, 3]], WALL_HORIZONTAL);
        assert_eq!(grid[[1, 4]], CELL_WALL);
        assert!(!are_wall_cells_free(&grid.view(), &wall));

        set_wall_cells(&mut grid.view_mut(), &wall, CELL_FREE);
        assert!(are_wall_cells_free(&grid.view(), &wall));
    }

    #[test]
    fn test_could_disconnect() {
        let mut grid = empty_grid(5);

        // Floating in the middle of an empty board
        assert!(!could_disconnect(&grid.view(), &Wall::horizontal((3, 3))));
        // Touching only the left edge
        assert!(!could_disconnect(&grid.view(), &Wall::horizontal((3, 1))));

        // Touching the left edge and a neighbouring horizontal wall
        mark_wall(&mut grid.view_mut(), &Wall::horizontal((3, 5)));
        assert!(could_disconnect(&grid.view(), &Wall::horizontal((3, 1))));

        // End to end with another vertical wall, plus the top edge
        let mut grid = empty_grid(5);
        mark_wall(&mut grid.view_mut(), &Wall::vertical((5, 1)));
        assert!(could_disconnect(&grid.view(), &Wall::vertical((1, 1))));
    }
}
