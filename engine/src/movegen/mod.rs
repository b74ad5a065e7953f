//! Move selection.
//!
//! Each tick runs a fixed cascade of strategies; the first that yields a
//! move wins. The halve flag is decided separately once the move is known.
//!
//! 1. leave a swamp the agent is standing in
//! 2. capture an adjacent general or city
//! 3. expand outward (every `outward_every` turns)
//! 4. follow the planned path toward the best target
//! 5. step toward the current exploration target
//! 6. expand outward, unconditionally

pub mod halve;
pub mod outward;
pub mod path;
pub mod priority;

use std::fmt;

use rand::Rng;

use crate::board::{Board, Move, TileId};
use crate::config::EngineConfig;
use crate::explore::ExplorationTracker;
use crate::search::{get_best_swamp_path, step_toward_me};

pub use halve::should_move_half;
pub use outward::{move_outward, neighbor_to_attack};
pub use path::{move_path, path_gather, path_proximity_target};
pub use priority::move_priority;

/// Everything one selection pass reads or updates.
pub struct TickContext<'a, R: Rng> {
    pub board: &'a Board,
    pub tracker: &'a mut ExplorationTracker,
    pub config: &'a EngineConfig,
    pub rng: &'a mut R,
}

/// The cascade step that produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    LeaveSwamp,
    Priority,
    Outward,
    PathTarget,
    Explore,
    Fallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::LeaveSwamp => "leave_swamp",
            Strategy::Priority => "priority",
            Strategy::Outward => "outward",
            Strategy::PathTarget => "path_target",
            Strategy::Explore => "explore",
            Strategy::Fallback => "fallback",
        };
        f.write_str(name)
    }
}

/// A selected move and the path it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub mv: Move,
    pub strategy: Strategy,
    /// The path being pursued; empty for one-step strategies.
    pub path: Vec<TileId>,
}

/// Runs the cascade and returns the first move found, with its halve flag
/// set.
pub fn select_move<R: Rng>(ctx: &mut TickContext<'_, R>) -> Option<Decision> {
    let board = ctx.board;
    let mut decision = choose(ctx)?;
    decision.mv.halve =
        should_move_half(board, decision.mv.source, decision.mv.dest, ctx.rng, ctx.config);
    tracing::debug!(
        turn = board.turn,
        strategy = %decision.strategy,
        source = decision.mv.source,
        dest = decision.mv.dest,
        halve = decision.mv.halve,
        "move selected"
    );
    Some(decision)
}

fn choose<R: Rng>(ctx: &mut TickContext<'_, R>) -> Option<Decision> {
    let board = ctx.board;
    let one_step = |mv: Move, strategy: Strategy| Decision {
        mv,
        strategy,
        path: Vec::new(),
    };

    if let Some((mv, path)) = leave_swamp(board) {
        return Some(Decision {
            mv,
            strategy: Strategy::LeaveSwamp,
            path,
        });
    }

    if let Some(mv) = move_priority(board) {
        return Some(one_step(mv, Strategy::Priority));
    }

    if board.turn % ctx.config.outward_every == 0 {
        if let Some(mv) = move_outward(board, &board.path) {
            return Some(one_step(mv, Strategy::Outward));
        }
    }

    let path = path_proximity_target(board, ctx.tracker);
    if let Some(mv) = move_path(board, &path) {
        return Some(Decision {
            mv,
            strategy: Strategy::PathTarget,
            path,
        });
    }

    if let Some(mv) = ctx
        .tracker
        .get_target(board)
        .and_then(|target| step_toward_me(board, target))
    {
        return Some(one_step(mv, Strategy::Explore));
    }

    move_outward(board, &[]).map(|mv| one_step(mv, Strategy::Fallback))
}

/// Moves an army stranded in a swamp along its best escape route.
///
/// Only armies of at least two are considered; tiles with no escape within
/// their budget are left where they are.
pub fn leave_swamp(board: &Board) -> Option<(Move, Vec<TileId>)> {
    board
        .own_tiles()
        .iter()
        .copied()
        .filter(|&id| board.tile(id).is_swamp && board.tile(id).army >= 2)
        .find_map(|id| {
            let escape = get_best_swamp_path(board, id)?;
            let mv = Move::new(escape.path[0], *escape.path.get(1)?, false);
            Some((mv, escape.path))
        })
}
