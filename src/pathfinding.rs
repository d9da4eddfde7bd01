use std::collections::VecDeque;

use ndarray::ArrayView2;

use crate::grid::{offset, Coord, CELL_FREE};

/// Orthogonal pawn steps as `(dr, dc)`; the edge slot crossed is half way.
const STEPS: [(isize, isize); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

/// Calculate the shortest distance, in pawn steps, from a pawn cell to a
/// target row using BFS.
///
/// A neighbouring pawn cell is reachable when the edge slot between the two
/// is free. Pawns never block the search: a path is about walls only.
///
/// # Arguments
/// * `grid` - The full game grid, side `2 * size - 1`
/// * `start` - Starting pawn cell in grid coordinates
/// * `target_row` - Grid row to reach
///
/// # Returns
/// The minimum number of steps to reach the target row, or `None` if
/// unreachable
pub fn distance_to_row(grid: &ArrayView2<i8>, start: Coord, target_row: usize) -> Option<usize> {
    let dim = grid.nrows();

    // Already at target
    if start.0 == target_row {
        return Some(0);
    }

    let mut visited = vec![false; dim * dim];
    visited[start.0 * dim + start.1] = true;

    let mut queue = VecDeque::with_capacity(dim * dim / 4 + 1);
    queue.push_back((start, 0usize));

    while let Some((cell, steps)) = queue.pop_front() {
        for (dr, dc) in STEPS {
            let Some(next) = offset(cell, dr, dc, dim) else {
                continue;
            };
            let index = next.0 * dim + next.1;
            if visited[index] {
                continue;
            }
            // The slot half way between is always on the board when `next` is
            let Some(slot) = offset(cell, dr / 2, dc / 2, dim) else {
                continue;
            };
            if grid[slot] != CELL_FREE {
                continue;
            }

            visited[index] = true;
            if next.0 == target_row {
                return Some(steps + 1);
            }
            queue.push_back((next, steps + 1));
        }
    }

    // No path found
    None
}

/// Check whether any path leads from `start` to `goal_row`.
pub fn has_path(grid: &ArrayView2<i8>, start: Coord, goal_row: usize) -> bool {
    distance_to_row(grid, start, goal_row).is_some()
}
