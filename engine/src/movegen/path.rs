//! Path planning and path following.

use crate::board::{Board, GeneralPolicy, Move, TileId};
use crate::eval::nearest_target_tile;
use crate::explore::ExplorationTracker;
use crate::search::{can_step_path, path_to};

/// Share of the general's army counted when choosing the source army.
const GENERAL_SOURCE_RATIO: f64 = 0.5;

/// Plans the path the agent should pursue this tick.
///
/// Targets the best attackable tile from the largest army. If the agent
/// cannot yet take the first foreign tile on that path, gathers armies
/// toward the largest tile instead, and failing that heads for the current
/// exploration target.
pub fn path_proximity_target(board: &Board, tracker: &mut ExplorationTracker) -> Vec<TileId> {
    let Some(source) = board.find_largest_tile(
        board.player_index,
        &[],
        GeneralPolicy::Ratio(GENERAL_SOURCE_RATIO),
    ) else {
        return Vec::new();
    };

    let path = nearest_target_tile(board, source)
        .map(|target| path_to(board, source, target))
        .unwrap_or_default();
    if can_step_path(board, &path) {
        return path;
    }

    let gather = path_gather(board);
    if gather.len() >= 2 {
        return gather;
    }

    tracker
        .get_target(board)
        .map(|target| path_to(board, source, target))
        .unwrap_or_default()
}

/// Path from the second-largest army to the largest, so the two merge.
pub fn path_gather(board: &Board) -> Vec<TileId> {
    let me = board.player_index;
    let Some(target) = board.find_largest_tile(me, &[], GeneralPolicy::Exclude) else {
        return Vec::new();
    };
    match board.find_largest_tile(me, &[target], GeneralPolicy::Ratio(GENERAL_SOURCE_RATIO)) {
        Some(source) if source != target => path_to(board, source, target),
        _ => Vec::new(),
    }
}

/// Chooses the next move along `path`.
///
/// A path ending on the agent's own kind of tile is a gather: the largest
/// army on it moves forward. Otherwise the move is the capture step that
/// first yields a positive surplus counting back from the end; it is only
/// kept if it lands on the path's end or the end is a general.
pub fn move_path(board: &Board, path: &[TileId]) -> Option<Move> {
    if path.len() < 2 {
        return None;
    }
    let source = board.tile(path[0]);
    let target = board.tile(path[path.len() - 1]);

    if target.kind == source.kind {
        return Some(move_path_largest(board, path));
    }

    let capture = move_path_capture(board, path);
    if target.is_general || capture.dest == target.id {
        Some(capture)
    } else {
        Some(move_path_largest(board, path))
    }
}

/// Moves the largest army of the source's kind one step along `path`. The
/// final tile never moves.
fn move_path_largest(board: &Board, path: &[TileId]) -> Move {
    let kind = board.tile(path[0]).kind;
    let mut largest = 0;
    for (i, &id) in path[..path.len() - 1].iter().enumerate() {
        let tile = board.tile(id);
        if tile.kind == kind && tile.army > board.tile(path[largest]).army {
            largest = i;
        }
    }
    Move::new(path[largest], path[largest + 1], false)
}

/// Walks `path` backwards accumulating `army - 1` for own tiles and `-army`
/// for the rest; the first own tile at which the total turns positive
/// moves forward.
fn move_path_capture(board: &Board, path: &[TileId]) -> Move {
    let kind = board.tile(path[0]).kind;
    let mut surplus = 0i64;
    for i in (0..path.len()).rev() {
        let tile = board.tile(path[i]);
        let own = tile.kind == kind;
        if own {
            surplus += i64::from(tile.army - 1);
        } else {
            surplus -= i64::from(tile.army);
        }
        if surplus > 0 && own && i + 1 < path.len() && tile.army > 1 {
            return Move::new(path[i], path[i + 1], false);
        }
    }
    move_path_largest(board, path)
}
