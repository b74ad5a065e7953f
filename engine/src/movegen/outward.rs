//! One-step expansion into adjacent tiles.

use crate::board::{Board, Move, Passage, TileId};

/// Picks the neighbour of `source` most worth taking this tick.
///
/// A neighbour qualifies if the agent should attack it and `source` beats
/// its army by more than one, or if it lies on `path`. Among qualifiers
/// cities come first, then small enemy stacks over empty land, then the
/// weakest tile. Swamps are only chosen when nothing else qualifies and the
/// agent has never held them.
pub fn neighbor_to_attack(board: &Board, source: TileId, path: &[TileId]) -> Option<TileId> {
    if !board.is_self(source) {
        return None;
    }
    let army = board.tile(source).army;
    let mut target: Option<TileId> = None;
    let mut swamp: Option<TileId> = None;

    for next in board.neighbors(source, Passage::ALL) {
        let tile = board.tile(next);
        let qualifies =
            (board.should_attack(next) && army > tile.army + 1) || path.contains(&next);
        if !qualifies {
            continue;
        }
        if tile.is_swamp {
            if tile.turn_held == 0 && swamp.is_none() {
                swamp = Some(next);
            }
            continue;
        }

        let Some(current) = target else {
            target = Some(next);
            continue;
        };
        let best = board.tile(current);
        let replace = if tile.is_city {
            !best.is_city || best.army > tile.army
        } else if !tile.is_empty() && tile.army <= 1 && best.is_empty() {
            true
        } else if best.army > tile.army && !best.is_city {
            !tile.is_empty() || best.army > 1
        } else {
            false
        };
        if replace {
            target = Some(next);
        }
    }
    target.or(swamp)
}

/// Moves the first owned army of at least two, not on `path`, into its best
/// neighbour. Swamp entries are used only if no other expansion exists.
pub fn move_outward(board: &Board, path: &[TileId]) -> Option<Move> {
    let mut swamp_move = None;

    for &source in board.own_tiles() {
        if board.tile(source).army < 2 || path.contains(&source) {
            continue;
        }
        let Some(target) = neighbor_to_attack(board, source, path) else {
            continue;
        };
        if !board.tile(target).is_swamp {
            return Some(Move::new(source, target, false));
        }
        swamp_move.get_or_insert(Move::new(source, target, false));
    }
    swamp_move
}
