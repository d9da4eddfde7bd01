//! Depth-limited minimax with optional alpha-beta pruning.
//!
//! The side to move at the root is the maximizing player. Root moves are
//! scored in parallel, each on its own copy of the board.

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::actions::{apply_move, legal_moves, Move};
use crate::game_state::{BoardState, PlayerId, Snapshot};

pub const DEFAULT_SEARCH_DEPTH: u32 = 1;
pub const DEFAULT_WALL_BONUS_WEIGHT: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched below each root move
    pub depth: u32,
    /// Heuristic bonus per wall the maximizing player still holds
    pub wall_bonus_weight: f32,
    /// Full-width search when false; the chosen move is the same either way
    pub alpha_beta: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_SEARCH_DEPTH,
            wall_bonus_weight: DEFAULT_WALL_BONUS_WEIGHT,
            alpha_beta: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchResult {
    pub best_move: Move,
    pub score: f32,
    /// Positions visited, summed over all root moves
    pub nodes: u64,
}

/// Choose a move for the side to move in `snapshot`.
///
/// A pawn move that reaches the goal row is taken immediately. Otherwise every
/// legal move is simulated and scored with a full window, and the first move
/// with the highest score in generation order wins. Returns `None` only when
/// the side to move has no legal move at all.
pub fn compute_move(snapshot: &Snapshot, config: &SearchConfig) -> Option<SearchResult> {
    let board = BoardState::from_snapshot(snapshot);
    let agent = board.active();
    let moves = legal_moves(&board, agent);
    if moves.is_empty() {
        debug!(player = %agent, "No legal moves to search");
        return None;
    }

    // Winning immediately beats anything the search could find
    let goal_row = board.player(agent).goal_row;
    if let Some(&winning) = moves
        .iter()
        .find(|mv| matches!(mv, Move::Pawn((row, _)) if *row == goal_row))
    {
        debug!(player = %agent, best_move = %winning, "Taking winning pawn move");
        return Some(SearchResult {
            best_move: winning,
            score: f32::INFINITY,
            nodes: 0,
        });
    }

    // Each root move gets its own board copy so the scoring can run in parallel
    let scored: Vec<(f32, u64)> = moves
        .par_iter()
        .map(|mv| {
            let child = simulate(&board, agent, mv);
            let mut nodes = 0;
            let score = search(
                &child,
                config.depth,
                f32::NEG_INFINITY,
                f32::INFINITY,
                false,
                config,
                &mut nodes,
            );
            (score, nodes)
        })
        .collect();

    let mut best_index = 0;
    for (index, (score, _)) in scored.iter().enumerate() {
        debug!(root_move = %moves[index], score, "Root move scored");
        if *score > scored[best_index].0 {
            best_index = index;
        }
    }

    let nodes: u64 = scored.iter().map(|(_, nodes)| nodes).sum();
    let result = SearchResult {
        best_move: moves[best_index],
        score: scored[best_index].0,
        nodes,
    };
    debug!(
        player = %agent,
        depth = config.depth,
        root_moves = moves.len(),
        nodes,
        best_move = %result.best_move,
        score = result.score,
        "Search finished"
    );
    Some(result)
}

/// Search with alpha-beta pruning enabled, returning only the move.
pub fn compute_move_with(snapshot: &Snapshot, depth: u32, wall_bonus_weight: f32) -> Option<Move> {
    let config = SearchConfig {
        depth,
        wall_bonus_weight,
        alpha_beta: true,
    };
    compute_move(snapshot, &config).map(|result| result.best_move)
}

/// Score `board` from the maximizing player's point of view.
///
/// The side to move on `board` is the maximizing player when `maximizing` is
/// true and the minimizing player otherwise.
pub fn minimax(
    board: &BoardState,
    depth: u32,
    alpha: f32,
    beta: f32,
    maximizing: bool,
    config: &SearchConfig,
) -> f32 {
    let mut nodes = 0;
    search(board, depth, alpha, beta, maximizing, config, &mut nodes)
}

fn search(
    board: &BoardState,
    depth: u32,
    mut alpha: f32,
    mut beta: f32,
    maximizing: bool,
    config: &SearchConfig,
    nodes: &mut u64,
) -> f32 {
    *nodes += 1;

    let mover = board.active();
    let max_player = if maximizing { mover } else { mover.opponent() };

    if board.has_won(max_player.opponent()) {
        return f32::NEG_INFINITY;
    }
    if board.has_won(max_player) {
        return f32::INFINITY;
    }
    if depth == 0 {
        return heuristic(board, max_player, config.wall_bonus_weight);
    }

    let moves = legal_moves(board, mover);
    if moves.is_empty() {
        return heuristic(board, max_player, config.wall_bonus_weight);
    }

    let mut best = if maximizing {
        f32::NEG_INFINITY
    } else {
        f32::INFINITY
    };
    for mv in &moves {
        let child = simulate(board, mover, mv);
        let eval = search(&child, depth - 1, alpha, beta, !maximizing, config, nodes);

        if maximizing {
            best = best.max(eval);
            alpha = alpha.max(eval);
        } else {
            best = best.min(eval);
            beta = beta.min(eval);
        }
        if config.alpha_beta && beta <= alpha {
            break;
        }
    }

    best
}

/// Copy of `board` with `mv` applied and the turn handed over.
fn simulate(board: &BoardState, mover: PlayerId, mv: &Move) -> BoardState {
    let mut child = board.clone();
    apply_move(&mut child, mover, mv);
    child.set_active(mover.opponent());
    child
}

/// Opponent row distance minus own row distance, plus a bonus for walls in
/// hand. Distances are grid rows to the goal row, ignoring walls.
fn heuristic(board: &BoardState, max_player: PlayerId, wall_bonus_weight: f32) -> f32 {
    let distance = |id: PlayerId| {
        let player = board.player(id);
        player.position.0.abs_diff(player.goal_row) as f32
    };

    let own = distance(max_player);
    let opponent = distance(max_player.opponent());
    let walls = board.player(max_player).walls_left as f32;

    opponent - own + wall_bonus_weight * walls
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Wall;

    fn board_with(size: usize, walls: u8, p1: (usize, usize), p2: (usize, usize)) -> BoardState {
        let mut board = BoardState::new(size, walls).unwrap();
        board.apply_pawn_move(PlayerId::One, p1);
        board.apply_pawn_move(PlayerId::Two, p2);
        board
    }

    #[test]
    fn test_takes_winning_pawn_move() {
        let board = board_with(5, 2, (2, 4), (6, 0));
        let result = compute_move(&board.snapshot(), &SearchConfig::default()).unwrap();
        assert_eq!(result.best_move, Move::Pawn((0, 4)));
        assert_eq!(result.score, f32::INFINITY);
        assert_eq!(result.nodes, 0);
    }

    #[test]
    fn test_blocks_opponent_about_to_win() {
        let mut board = board_with(5, 2, (2, 4), (0, 0));
        board.set_active(PlayerId::Two);

        let result = compute_move(&board.snapshot(), &SearchConfig::default()).unwrap();
        match result.best_move {
            Move::Wall(wall) => assert!(wall.slots().contains(&(1, 4))),
            Move::Pawn(_) => panic!("expected a blocking wall, got {}", result.best_move),
        }
        assert!(result.score.is_finite());
    }

    #[test]
    fn test_heuristic_prefers_shorter_path() {
        let board = BoardState::new(5, 0).unwrap();
        let config = SearchConfig::default();
        // Symmetric start: both players are eight grid rows away
        assert_eq!(minimax(&board, 0, f32::NEG_INFINITY, f32::INFINITY, true, &config), 0.0);

        let mut board = board;
        board.apply_pawn_move(PlayerId::One, (6, 4));
        board.set_active(PlayerId::Two);
        // Player one to maximize, player two to move; one pawn step is two rows
        assert_eq!(minimax(&board, 0, f32::NEG_INFINITY, f32::INFINITY, false, &config), 2.0);
    }

    #[test]
    fn test_heuristic_ignores_detours() {
        let mut board = board_with(5, 2, (8, 4), (0, 0));
        // Player one has to walk round these walls; the row distance stays eight
        board.apply_wall(PlayerId::Two, &Wall::horizontal((7, 3)));
        board.apply_wall(PlayerId::Two, &Wall::horizontal((7, 7)));
        let config = SearchConfig {
            depth: 0,
            wall_bonus_weight: 0.0,
            alpha_beta: true,
        };
        assert_eq!(minimax(&board, 0, f32::NEG_INFINITY, f32::INFINITY, true, &config), 0.0);
    }

    #[test]
    fn test_wall_bonus_counts_max_player_walls() {
        let board = BoardState::new(5, 3).unwrap();
        let config = SearchConfig {
            depth: 0,
            wall_bonus_weight: 2.0,
            alpha_beta: true,
        };
        assert_eq!(minimax(&board, 0, f32::NEG_INFINITY, f32::INFINITY, true, &config), 6.0);
    }

    #[test]
    fn test_terminal_scores() {
        let config = SearchConfig::default();
        let mut board = board_with(5, 0, (0, 2), (4, 0));
        board.set_active(PlayerId::Two);
        // Player two maximizing while player one already sits on its goal row
        assert_eq!(
            minimax(&board, 3, f32::NEG_INFINITY, f32::INFINITY, true, &config),
            f32::NEG_INFINITY
        );
        assert_eq!(
            minimax(&board, 3, f32::NEG_INFINITY, f32::INFINITY, false, &config),
            f32::INFINITY
        );
    }

    #[test]
    fn test_pruning_does_not_change_choice() {
        let mut board = BoardState::new(5, 1).unwrap();
        board.apply_wall(PlayerId::Two, &Wall::horizontal((5, 3)));
        board.apply_pawn_move(PlayerId::One, (6, 2));

        for depth in 1..=2 {
            let pruned = SearchConfig {
                depth,
                wall_bonus_weight: 1.5,
                alpha_beta: true,
            };
            let full = SearchConfig {
                alpha_beta: false,
                ..pruned
            };
            let a = compute_move(&board.snapshot(), &pruned).unwrap();
            let b = compute_move(&board.snapshot(), &full).unwrap();
            assert_eq!(a.best_move, b.best_move);
            assert_eq!(a.score, b.score);
            assert!(a.nodes <= b.nodes);
        }
    }

    #[test]
    fn test_search_leaves_snapshot_untouched() {
        let board = BoardState::new(5, 2).unwrap();
        let snapshot = board.snapshot();
        compute_move(&snapshot, &SearchConfig::default()).unwrap();
        assert_eq!(BoardState::from_snapshot(&snapshot), board);
    }

    #[test]
    fn test_compute_move_with() {
        let board = board_with(5, 2, (2, 4), (6, 0));
        assert_eq!(
            compute_move_with(&board.snapshot(), 2, 1.5),
            Some(Move::Pawn((0, 4)))
        );
    }
}
