//! Engine state management.
//!
//! Holds the current game's board, the exploration tracker, engine options
//! and the RNG, and turns each tick into at most one move.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::board::{Board, Move, UpdateError, ViewSnapshot};
use crate::config::{EngineConfig, OptionError};
use crate::explore::ExplorationTracker;
use crate::movegen::{select_move, Decision, TickContext};
use crate::protocol::{format_move, GameStart, GameUpdate, MoveCommand};

/// Errors surfaced by the engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("update received before game start")]
    UpdateBeforeStart,

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Option(#[from] OptionError),
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    pub board: Option<Board>,
    pub tracker: ExplorationTracker,
    pub config: EngineConfig,
    pending_start: Option<GameStart>,
    moves_realized: u64,
    rng: SmallRng,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let rng = seeded_rng(config.seed);
        Engine {
            board: None,
            tracker: ExplorationTracker::new(),
            config,
            pending_start: None,
            moves_realized: 0,
            rng,
        }
    }

    /// Resets all game state for a new game. The board is built on the
    /// first update, which carries the dimensions.
    pub fn start_game(&mut self, start: GameStart) {
        tracing::info!(
            player = start.player_index,
            players = start.usernames.len(),
            swamps = start.swamps.len(),
            "game started"
        );
        self.board = None;
        self.tracker = ExplorationTracker::new();
        self.moves_realized = 0;
        self.pending_start = Some(start);
    }

    /// Folds one tick update into the board and returns it.
    pub fn apply_update(&mut self, update: &GameUpdate) -> Result<&Board, EngineError> {
        match self.board.as_mut() {
            Some(board) => board.apply_update(update)?,
            None => {
                let start = self
                    .pending_start
                    .as_ref()
                    .ok_or(EngineError::UpdateBeforeStart)?;
                let mut board = Board::from_start(start, update)?;
                board.do_not_attack = self.config.do_not_attack.clone();
                board.dirty_window = self.config.dirty_window;
                tracing::info!(rows = board.rows(), cols = board.cols(), "board created");
                self.board = Some(board);
            }
        }
        tracing::trace!(turn = update.turn, "update applied");
        self.board.as_ref().ok_or(EngineError::UpdateBeforeStart)
    }

    /// Marks the game over.
    pub fn apply_result(&mut self, won: bool) {
        tracing::info!(won, moves = self.moves_realized, "game over");
        if let Some(board) = self.board.as_mut() {
            board.apply_result(won);
        }
    }

    /// Sets an engine option and pushes it to the live board.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), EngineError> {
        let seed = self.config.seed;
        self.config.set_option(name, value)?;
        if self.config.seed != seed {
            self.rng = seeded_rng(self.config.seed);
        }
        if let Some(board) = self.board.as_mut() {
            board.do_not_attack = self.config.do_not_attack.clone();
            board.dirty_window = self.config.dirty_window;
        }
        tracing::debug!(name, value, "option set");
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.board.as_ref().is_some_and(|b| b.complete)
    }

    pub fn moves_realized(&self) -> u64 {
        self.moves_realized
    }

    /// Runs the move cascade against the current board.
    ///
    /// Records the pursued path on the board and, if enabled, applies the
    /// move's expected outcome locally.
    pub fn next_move(&mut self) -> Option<Move> {
        let board = self.board.as_ref().filter(|b| !b.complete)?;
        let mut ctx = TickContext {
            board,
            tracker: &mut self.tracker,
            config: &self.config,
            rng: &mut self.rng,
        };
        let Some(decision) = select_move(&mut ctx) else {
            tracing::debug!(turn = board.turn, "no move this tick");
            return None;
        };
        self.place_move(decision)
    }

    /// Commits a selected move unless its destination is off the board or a
    /// mountain.
    fn place_move(&mut self, decision: Decision) -> Option<Move> {
        let board = self.board.as_mut()?;
        let (row, col) = board.tile(decision.mv.dest).coords();
        if !board.is_valid_position(row, col) {
            tracing::warn!(row, col, strategy = %decision.strategy, "move onto invalid position dropped");
            return None;
        }

        let gathering = decision.path.last().is_some_and(|&end| board.is_self(end));
        board.collect_path = if gathering {
            decision.path.clone()
        } else {
            Vec::new()
        };
        board.path = decision.path;
        if self.config.predict_moves {
            board.apply_predicted_move(&decision.mv);
        }
        self.moves_realized += 1;
        board.bottom_text = format!("Realized: {}", self.moves_realized);
        Some(decision.mv)
    }

    /// Like `next_move`, but in grid coordinates.
    pub fn next_move_command(&mut self) -> Option<MoveCommand> {
        let mv = self.next_move()?;
        self.board.as_ref().map(|board| format_move(board, &mv))
    }

    pub fn snapshot(&self) -> Option<ViewSnapshot> {
        self.board.as_ref().map(ViewSnapshot::capture)
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}

fn seeded_rng(seed: u64) -> SmallRng {
    if seed == 0 {
        SmallRng::from_entropy()
    } else {
        SmallRng::seed_from_u64(seed)
    }
}
