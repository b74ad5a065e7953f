//! Reverse search from a target back toward the agent's armies.

use std::collections::VecDeque;

use crate::board::{Board, GeneralPolicy, Move, Passage, TileId};

/// Strength added when the reverse search crosses a swamp.
const SWAMP_PENALTY: f64 = 1.0;
/// Overhead applied to foreign armies the approach would have to cut through.
const FOREIGN_MARGIN: f64 = 1.1;

/// Finds the first move that brings a sufficient army one step closer to
/// `target`.
///
/// Walks outward from `target`, accumulating the strength needed to reach
/// it: own tiles on the way contribute `army - 1`, foreign tiles demand
/// `(army + 1) * 1.1`. The first own tile with at least two army that tips
/// the balance below zero moves one step back along the search tree.
/// Gives up once the agent's largest tile is reached without success.
pub fn step_toward_me(board: &Board, target: TileId) -> Option<Move> {
    let largest = board.find_largest_tile(board.player_index, &[], GeneralPolicy::Include);
    let size = board.tiles().len();
    let mut strength: Vec<Option<f64>> = vec![None; size];
    let mut queue = VecDeque::new();

    strength[target] = Some(if board.is_self(target) {
        0.0
    } else {
        f64::from(board.tile(target).army)
    });
    queue.push_back(target);

    while let Some(current) = queue.pop_front() {
        let current_strength = strength[current].unwrap_or(0.0);
        for next in board.neighbors(current, Passage::ALL) {
            if strength[next].is_some() {
                continue;
            }
            let tile = board.tile(next);
            let own = board.is_self(next);
            let mut needed = if own {
                current_strength - f64::from(tile.army - 1)
            } else {
                current_strength + f64::from(tile.army + 1) * FOREIGN_MARGIN
            };
            if tile.is_swamp {
                needed += SWAMP_PENALTY;
            }
            strength[next] = Some(needed);

            if own {
                if needed < 0.0 && tile.army >= 2 {
                    return Some(Move::new(next, current, false));
                }
                if Some(next) == largest {
                    return None;
                }
            }
            queue.push_back(next);
        }
    }
    None
}
