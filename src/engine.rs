//! Turn sequencing, history and computer play on top of the rules.
//!
//! Every accepted move goes through one commit path: save a snapshot, apply
//! the validated move, clear the redo stack, check for a win, hand the turn
//! over. A rejected move leaves no trace in the history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, info, warn};

use crate::actions::Move;
use crate::agents::{MoveSelector, RandomAgent, SearchAgent};
use crate::config::GameConfig;
use crate::error::{BoardError, EngineError, EngineResult, MoveRejection};
use crate::game_state::{BoardState, PlayerId, Snapshot};
use crate::grid::{Coord, Wall};
use crate::history::HistoryManager;
use crate::minimax::SearchConfig;
use crate::validation::{direction_to, try_pawn_move, Direction};
use crate::walls::{place_wall, place_wall_slots};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Player1Turn,
    Player2Turn,
    Finished { winner: PlayerId },
}

impl TurnState {
    fn to_move(id: PlayerId) -> Self {
        match id {
            PlayerId::One => TurnState::Player1Turn,
            PlayerId::Two => TurnState::Player2Turn,
        }
    }

    fn from_board(board: &BoardState) -> Self {
        match board.winner() {
            Some(winner) => TurnState::Finished { winner },
            None => TurnState::to_move(board.active()),
        }
    }

    /// Player to move, or `None` once the game is over.
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            TurnState::Player1Turn => Some(PlayerId::One),
            TurnState::Player2Turn => Some(PlayerId::Two),
            TurnState::Finished { .. } => None,
        }
    }
}

/// Who decides the moves for one side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Controller {
    Human,
    Computer(SearchConfig),
    Random,
}

impl Controller {
    pub fn is_human(&self) -> bool {
        matches!(self, Controller::Human)
    }

    /// Pick a move for the side to move. Humans never pick here.
    fn select_move(&self, snapshot: &Snapshot) -> Option<Move> {
        match self {
            Controller::Human => None,
            Controller::Computer(config) => SearchAgent::new(*config).select_move(snapshot),
            Controller::Random => RandomAgent::new().select_move(snapshot),
        }
    }
}

/// When the computer answers a human move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComputerTurns {
    /// Reply synchronously inside the human's move request
    #[default]
    Inline,
    /// Caller drives computer turns through [`GameEngine::play_computer_turn`]
    /// or [`GameEngine::spawn_search`]
    Deferred,
}

/// A search running on a worker thread. Hand it back to
/// [`GameEngine::complete_search`] to apply the result. Dropping the task
/// abandons the search: its move is discarded and the engine accepts requests
/// again.
#[derive(Debug)]
pub struct SearchTask {
    player: PlayerId,
    handle: JoinHandle<Option<Move>>,
    in_flight: InFlight,
}

/// Holds the engine's in-flight flag up while a search task is alive.
#[derive(Debug)]
struct InFlight(Arc<AtomicBool>);

impl InFlight {
    fn raise(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        InFlight(Arc::clone(flag))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SearchTask {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

pub struct GameEngine {
    board: BoardState,
    history: HistoryManager,
    turn: TurnState,
    controllers: [Controller; 2],
    computer_turns: ComputerTurns,
    search_in_flight: Arc<AtomicBool>,
}

impl GameEngine {
    pub fn new(
        board_size: usize,
        walls_per_player: u8,
        controllers: [Controller; 2],
    ) -> Result<Self, BoardError> {
        let board = BoardState::new(board_size, walls_per_player)?;
        let turn = TurnState::from_board(&board);
        Ok(GameEngine {
            board,
            history: HistoryManager::new(),
            turn,
            controllers,
            computer_turns: ComputerTurns::default(),
            search_in_flight: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn from_config(config: &GameConfig) -> Result<Self, BoardError> {
        GameEngine::new(
            config.quoridor.board_size,
            config.quoridor.walls_per_player,
            [
                config.controller(PlayerId::One),
                config.controller(PlayerId::Two),
            ],
        )
    }

    pub fn with_computer_turns(mut self, computer_turns: ComputerTurns) -> Self {
        self.computer_turns = computer_turns;
        self
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn snapshot(&self) -> Snapshot {
        self.board.snapshot()
    }

    pub fn turn(&self) -> TurnState {
        self.turn
    }

    pub fn current_player(&self) -> Option<PlayerId> {
        self.turn.player()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        match self.turn {
            TurnState::Finished { winner } => Some(winner),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner().is_some()
    }

    pub fn controller(&self, id: PlayerId) -> Controller {
        self.controllers[id.index()]
    }

    pub fn is_search_in_flight(&self) -> bool {
        self.search_in_flight.load(Ordering::SeqCst)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Move the current human player's pawn.
    pub fn request_pawn_move(&mut self, direction: Direction) -> EngineResult<Coord> {
        let player = self.ensure_human_turn()?;
        let destination = self.commit(player, |board| try_pawn_move(board, player, direction))?;
        self.after_human_move()?;
        Ok(destination)
    }

    /// Place a wall for the current human player from its three slots.
    pub fn request_wall(&mut self, slots: [Coord; 3]) -> EngineResult<Wall> {
        let player = self.ensure_human_turn()?;
        let wall = self.commit(player, |board| place_wall_slots(board, player, slots))?;
        self.after_human_move()?;
        Ok(wall)
    }

    /// Place a wall from its two endpoints; the centre is derived.
    pub fn request_wall_between(&mut self, anchor: Coord, end: Coord) -> EngineResult<Wall> {
        let player = self.ensure_human_turn()?;
        let wall = self.commit(player, |board| {
            let wall = Wall::between(anchor, end, board.dim())?;
            place_wall(board, player, &wall)?;
            Ok(wall)
        })?;
        self.after_human_move()?;
        Ok(wall)
    }

    /// Apply a [`Move`] value for the current human player.
    pub fn apply_move(&mut self, mv: Move) -> EngineResult<()> {
        let player = self.ensure_human_turn()?;
        self.commit_move(player, mv)?;
        self.after_human_move()
    }

    /// Search and commit a move for the computer player to move.
    pub fn play_computer_turn(&mut self) -> EngineResult<Move> {
        let player = self.ensure_can_move()?;
        let controller = self.controller(player);
        if controller.is_human() {
            return Err(EngineError::NotComputerTurn);
        }

        let mv = controller
            .select_move(&self.board.snapshot())
            .ok_or(EngineError::NoLegalMoves(player))?;
        self.commit_move(player, mv)?;
        info!(player = %player, mv = %mv, "Computer moved");
        Ok(mv)
    }

    /// Start the computer's search on a worker thread.
    ///
    /// The worker owns its own snapshot. Until the task is passed to
    /// [`GameEngine::complete_search`] or dropped, moves, undo and redo are
    /// refused.
    pub fn spawn_search(&mut self) -> EngineResult<SearchTask> {
        let player = self.ensure_can_move()?;
        let controller = self.controller(player);
        if controller.is_human() {
            return Err(EngineError::NotComputerTurn);
        }

        let snapshot = self.board.snapshot();
        let handle = thread::spawn(move || controller.select_move(&snapshot));
        let in_flight = InFlight::raise(&self.search_in_flight);
        debug!(player = %player, "Search started");
        Ok(SearchTask {
            player,
            handle,
            in_flight,
        })
    }

    /// Wait for a search started by [`GameEngine::spawn_search`] and commit its
    /// move.
    pub fn complete_search(&mut self, task: SearchTask) -> EngineResult<Move> {
        let SearchTask {
            player,
            handle,
            in_flight,
        } = task;
        let outcome = handle.join();
        drop(in_flight);

        let mv = outcome
            .map_err(|_| EngineError::SearchPanicked)?
            .ok_or(EngineError::NoLegalMoves(player))?;
        self.commit_move(player, mv)?;
        info!(player = %player, mv = %mv, "Computer moved");
        Ok(mv)
    }

    /// Step back one move, or a full round when playing against a computer so
    /// that a human is to move again. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self) -> EngineResult<bool> {
        self.ensure_idle()?;
        if !self.history.undo(&mut self.board) {
            return Ok(false);
        }
        self.turn = TurnState::from_board(&self.board);
        while self.waiting_on_computer() && self.history.undo(&mut self.board) {
            self.turn = TurnState::from_board(&self.board);
        }
        debug!(turn = ?self.turn, "Undo");
        Ok(true)
    }

    /// Mirror of [`GameEngine::undo`].
    pub fn redo(&mut self) -> EngineResult<bool> {
        self.ensure_idle()?;
        if !self.history.redo(&mut self.board) {
            return Ok(false);
        }
        self.turn = TurnState::from_board(&self.board);
        while self.waiting_on_computer() && self.history.redo(&mut self.board) {
            self.turn = TurnState::from_board(&self.board);
        }
        debug!(turn = ?self.turn, "Redo");
        Ok(true)
    }

    /// True when a human plays in this game but a computer is to move.
    fn waiting_on_computer(&self) -> bool {
        let has_human = self.controllers.iter().any(Controller::is_human);
        match self.current_player() {
            Some(player) => has_human && !self.controller(player).is_human(),
            None => false,
        }
    }

    fn ensure_idle(&self) -> EngineResult<()> {
        if self.is_search_in_flight() {
            warn!("Request refused: search in flight");
            return Err(EngineError::SearchInFlight);
        }
        if self.is_finished() {
            warn!("Request refused: game is finished");
            return Err(EngineError::GameFinished);
        }
        Ok(())
    }

    /// Player to move, if moves are currently accepted.
    fn ensure_can_move(&self) -> EngineResult<PlayerId> {
        self.ensure_idle()?;
        self.current_player().ok_or(EngineError::GameFinished)
    }

    fn ensure_human_turn(&self) -> EngineResult<PlayerId> {
        let player = self.ensure_can_move()?;
        if !self.controller(player).is_human() {
            warn!(player = %player, "Request refused: not a human turn");
            return Err(EngineError::NotHumanTurn);
        }
        Ok(player)
    }

    fn after_human_move(&mut self) -> EngineResult<()> {
        if self.computer_turns != ComputerTurns::Inline {
            return Ok(());
        }
        match self.current_player() {
            Some(player) if !self.controller(player).is_human() => {
                self.play_computer_turn()?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Re-validate a generated move through the same rules a human request uses.
    fn commit_move(&mut self, player: PlayerId, mv: Move) -> EngineResult<()> {
        self.commit(player, |board| match mv {
            Move::Pawn(destination) => {
                let direction =
                    direction_to(board, player, destination).ok_or(MoveRejection::Unreachable)?;
                try_pawn_move(board, player, direction).map(|_| ())
            }
            Move::Wall(wall) => place_wall(board, player, &wall),
        })
    }

    fn commit<T>(
        &mut self,
        player: PlayerId,
        apply: impl FnOnce(&mut BoardState) -> Result<T, MoveRejection>,
    ) -> EngineResult<T> {
        self.history.save(&self.board);
        match apply(&mut self.board) {
            Ok(value) => {
                self.history.clear_redo();
                self.finish_turn(player);
                Ok(value)
            }
            Err(rejection) => {
                self.history.discard_last();
                debug!(player = %player, %rejection, "Move rejected");
                Err(rejection.into())
            }
        }
    }

    fn finish_turn(&mut self, player: PlayerId) {
        if self.board.has_won(player) {
            self.turn = TurnState::Finished { winner: player };
            info!(winner = %player, "Game over");
            return;
        }
        let next = player.opponent();
        self.board.set_active(next);
        self.turn = TurnState::to_move(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human_game(size: usize, walls: u8) -> GameEngine {
        GameEngine::new(size, walls, [Controller::Human, Controller::Human]).unwrap()
    }

    #[test]
    fn test_pawn_move_flips_turn() {
        let mut engine = human_game(9, 10);
        assert_eq!(engine.turn(), TurnState::Player1Turn);

        assert_eq!(engine.request_pawn_move(Direction::Up), Ok((14, 8)));
        assert_eq!(engine.turn(), TurnState::Player2Turn);
        assert_eq!(engine.board().active(), PlayerId::Two);
        assert!(engine.can_undo());
    }

    #[test]
    fn test_rejected_move_keeps_turn_and_history() {
        let mut engine = human_game(9, 10);
        let before = engine.snapshot();

        assert_eq!(
            engine.request_pawn_move(Direction::Down),
            Err(EngineError::Rejected(MoveRejection::OutOfBounds))
        );
        assert_eq!(
            engine.request_wall([(1, 0), (1, 1), (3, 1)]),
            Err(EngineError::Rejected(MoveRejection::MalformedWall))
        );
        assert_eq!(engine.turn(), TurnState::Player1Turn);
        assert_eq!(engine.snapshot(), before);
        assert!(!engine.can_undo());
    }

    #[test]
    fn test_wall_undo_redo() {
        let mut engine = human_game(9, 10);
        let start = engine.snapshot();

        let wall = engine.request_wall_between((7, 6), (7, 8)).unwrap();
        assert_eq!(wall, Wall::horizontal((7, 7)));
        assert_eq!(engine.board().player(PlayerId::One).walls_left, 9);
        let after = engine.snapshot();

        assert_eq!(engine.undo(), Ok(true));
        assert_eq!(engine.snapshot(), start);
        assert_eq!(engine.turn(), TurnState::Player1Turn);

        assert_eq!(engine.redo(), Ok(true));
        assert_eq!(engine.snapshot(), after);
        assert_eq!(engine.turn(), TurnState::Player2Turn);
        assert_eq!(engine.redo(), Ok(false));
    }

    #[test]
    fn test_new_move_clears_redo() {
        let mut engine = human_game(9, 10);
        engine.request_pawn_move(Direction::Up).unwrap();
        engine.undo().unwrap();
        assert!(engine.can_redo());

        engine.request_pawn_move(Direction::Left).unwrap();
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_apply_move_rejects_unreachable_cell() {
        let mut engine = human_game(9, 10);
        assert_eq!(
            engine.apply_move(Move::Pawn((12, 8))),
            Err(EngineError::Rejected(MoveRejection::Unreachable))
        );
        assert_eq!(engine.apply_move(Move::Pawn((14, 8))), Ok(()));
    }

    #[test]
    fn test_win_finishes_game() {
        let mut engine = human_game(3, 1);
        engine.request_pawn_move(Direction::Up).unwrap();
        // Player two jumps straight over player one onto its goal row
        assert_eq!(engine.request_pawn_move(Direction::Down), Ok((4, 2)));

        assert_eq!(engine.turn(), TurnState::Finished { winner: PlayerId::Two });
        assert_eq!(engine.winner(), Some(PlayerId::Two));
        assert_eq!(
            engine.request_pawn_move(Direction::Left),
            Err(EngineError::GameFinished)
        );
        assert_eq!(engine.undo(), Err(EngineError::GameFinished));
        assert_eq!(engine.redo(), Err(EngineError::GameFinished));
    }

    #[test]
    fn test_human_request_on_computer_turn() {
        let mut engine = GameEngine::new(5, 2, [Controller::Random, Controller::Human])
            .unwrap()
            .with_computer_turns(ComputerTurns::Deferred);

        assert_eq!(
            engine.request_pawn_move(Direction::Up),
            Err(EngineError::NotHumanTurn)
        );
        engine.play_computer_turn().unwrap();
        assert_eq!(engine.turn(), TurnState::Player2Turn);
        assert_eq!(engine.play_computer_turn(), Err(EngineError::NotComputerTurn));
    }

    #[test]
    fn test_inline_computer_reply_and_round_undo() {
        let config = SearchConfig::default();
        let mut engine =
            GameEngine::new(5, 2, [Controller::Human, Controller::Computer(config)]).unwrap();
        let start = engine.snapshot();

        engine.request_pawn_move(Direction::Up).unwrap();
        // The computer has already answered
        assert_eq!(engine.turn(), TurnState::Player1Turn);
        assert_ne!(engine.snapshot(), start);

        // One undo takes back both halves of the round
        assert_eq!(engine.undo(), Ok(true));
        assert_eq!(engine.snapshot(), start);
        assert_eq!(engine.turn(), TurnState::Player1Turn);
        assert!(!engine.can_undo());

        assert_eq!(engine.redo(), Ok(true));
        assert_eq!(engine.turn(), TurnState::Player1Turn);
        assert!(!engine.can_redo());
    }

    #[test]
    fn test_background_search_blocks_requests() {
        let config = SearchConfig::default();
        let mut engine =
            GameEngine::new(5, 2, [Controller::Human, Controller::Computer(config)])
                .unwrap()
                .with_computer_turns(ComputerTurns::Deferred);
        engine.request_pawn_move(Direction::Up).unwrap();

        let task = engine.spawn_search().unwrap();
        assert_eq!(task.player(), PlayerId::Two);
        assert!(engine.is_search_in_flight());
        assert_eq!(
            engine.request_pawn_move(Direction::Up),
            Err(EngineError::SearchInFlight)
        );
        assert_eq!(engine.undo(), Err(EngineError::SearchInFlight));
        assert_eq!(engine.play_computer_turn(), Err(EngineError::SearchInFlight));

        engine.complete_search(task).unwrap();
        assert!(!engine.is_search_in_flight());
        assert_eq!(engine.turn(), TurnState::Player1Turn);
    }

    #[test]
    fn test_dropped_search_releases_engine() {
        let config = SearchConfig::default();
        let mut engine =
            GameEngine::new(5, 2, [Controller::Human, Controller::Computer(config)])
                .unwrap()
                .with_computer_turns(ComputerTurns::Deferred);
        engine.request_pawn_move(Direction::Up).unwrap();
        let before = engine.snapshot();

        let task = engine.spawn_search().unwrap();
        assert!(engine.is_search_in_flight());
        drop(task);

        assert!(!engine.is_search_in_flight());
        assert_eq!(engine.snapshot(), before);
        assert_eq!(engine.turn(), TurnState::Player2Turn);
        // The computer can still take its turn
        engine.play_computer_turn().unwrap();
        assert_eq!(engine.turn(), TurnState::Player1Turn);
    }

    #[test]
    fn test_from_config() {
        let config = GameConfig::default();
        let engine = GameEngine::from_config(&config).unwrap();
        assert_eq!(engine.board().size(), 9);
        assert!(engine.controller(PlayerId::One).is_human());
        assert_eq!(
            engine.controller(PlayerId::Two),
            Controller::Computer(SearchConfig::default())
        );
    }
}
