//! Wall placement: slot availability plus the connectivity invariant.
//!
//! A wall is only committed when, with it in place, both players still have
//! a path to their goal rows.

use crate::error::MoveRejection;
use crate::game_state::{BoardState, PlayerId};
use crate::grid::{
    are_wall_cells_free, could_disconnect, set_wall_cells, Coord, Wall, CELL_FREE, CELL_WALL,
};
use crate::pathfinding::has_path;

/// Validate a wall placement for `player`.
///
/// The wall is marked on the grid while both players' paths are checked and
/// always removed again before returning, so the board is left as it was.
pub fn check_wall(
    board: &mut BoardState,
    player: PlayerId,
    wall: &Wall,
) -> Result<(), MoveRejection> {
    if board.player(player).walls_left == 0 {
        return Err(MoveRejection::NoWallsLeft);
    }
    if !are_wall_cells_free(&board.grid(), wall) {
        return Err(MoveRejection::OccupiedSlot);
    }

    // If the wall doesn't touch the edge or other walls at 2+ points, it can't block
    if !could_disconnect(&board.grid(), wall) {
        return Ok(());
    }

    set_wall_cells(&mut board.grid_mut().view_mut(), wall, CELL_WALL);
    let isolated = PlayerId::BOTH.into_iter().find(|&id| {
        let p = board.player(id);
        !has_path(&board.grid(), p.position, p.goal_row)
    });
    set_wall_cells(&mut board.grid_mut().view_mut(), wall, CELL_FREE);

    match isolated {
        Some(id) => Err(MoveRejection::WouldIsolate(id)),
        None => Ok(()),
    }
}

/// Validate and commit a wall: the three slots are marked, the centre gets the
/// orientation code and the player's wall count drops by one.
pub fn place_wall(
    board: &mut BoardState,
    player: PlayerId,
    wall: &Wall,
) -> Result<(), MoveRejection> {
    check_wall(board, player, wall)?;
    board.apply_wall(player, wall);
    Ok(())
}

/// Same as [`place_wall`], starting from raw slot coordinates.
pub fn place_wall_slots(
    board: &mut BoardState,
    player: PlayerId,
    slots: [Coord; 3],
) -> Result<Wall, MoveRejection> {
    let wall = Wall::from_slots(slots, board.dim())?;
    place_wall(board, player, &wall)?;
    Ok(wall)
}
