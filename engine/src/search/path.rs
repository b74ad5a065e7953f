//! Capture-aware path search.
//!
//! A breadth-first traversal that carries a projected army total: stepping
//! onto a team tile picks up `army - 1`, stepping onto anything else costs
//! `army + 1`. A foreign tile is only entered if the frontier arriving at it
//! outnumbers it. Nodes are enqueued in arrival order, but each keeps the
//! most favourable total seen so far and the predecessor that produced it.

use std::collections::VecDeque;

use crate::board::{Board, Passage, TileId};

/// Per-node bookkeeping of one search.
#[derive(Debug, Clone)]
pub struct PathSearch {
    came_from: Vec<Option<TileId>>,
    army: Vec<Option<i64>>,
    source: TileId,
}

impl PathSearch {
    fn new(size: usize, source: TileId, source_army: i64) -> Self {
        let mut search = PathSearch {
            came_from: vec![None; size],
            army: vec![None; size],
            source,
        };
        search.army[source] = Some(source_army);
        search
    }

    /// Records `total` for `node` if it beats the current record.
    ///
    /// The recorded total of a node never decreases.
    pub fn relax(&mut self, node: TileId, from: TileId, total: i64) -> bool {
        match self.army[node] {
            Some(best) if best >= total => false,
            _ => {
                self.army[node] = Some(total);
                self.came_from[node] = Some(from);
                true
            }
        }
    }

    /// Best projected army on arrival at `node`, if it was reached.
    pub fn army_at(&self, node: TileId) -> Option<i64> {
        self.army[node]
    }

    pub fn reached(&self, node: TileId) -> bool {
        self.army[node].is_some()
    }

    /// Walks predecessor links from `dest` back to the source.
    pub fn path_to(&self, dest: TileId) -> Vec<TileId> {
        if !self.reached(dest) {
            return Vec::new();
        }
        let mut path = vec![dest];
        let mut current = dest;
        while current != self.source {
            match self.came_from[current] {
                Some(prev) => {
                    path.push(prev);
                    current = prev;
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// Runs the capture-aware search from `source` until `dest` is dequeued or
/// the frontier is exhausted.
pub fn search_from(board: &Board, source: TileId, dest: TileId, passage: Passage) -> PathSearch {
    let size = board.tiles().len();
    let mut search = PathSearch::new(size, source, i64::from(board.tile(source).army));
    let mut queued = vec![false; size];
    let mut processed = vec![false; size];
    let mut frontier = VecDeque::new();
    frontier.push_back(source);
    queued[source] = true;

    while let Some(current) = frontier.pop_front() {
        if current == dest {
            break;
        }
        let current_army = search.army_at(current).unwrap_or(0);

        for next in board.neighbors(current, passage) {
            if processed[next] {
                continue;
            }
            let tile = board.tile(next);
            let on_team = board.is_on_team(next);
            if !(on_team || next == dest || i64::from(tile.army) < current_army) {
                continue;
            }
            if !queued[next] {
                queued[next] = true;
                frontier.push_back(next);
            }
            let total = if on_team {
                current_army + i64::from(tile.army - 1)
            } else {
                current_army - i64::from(tile.army + 1)
            };
            search.relax(next, current, total);
        }
        processed[current] = true;
    }
    search
}

/// Shortest feasible path from `source` to `dest`, inclusive.
///
/// Cities are avoided on the first attempt; if that cannot reach `dest`
/// the search is retried once with cities passable. Returns an empty path
/// when `dest` stays unreachable.
pub fn path_to(board: &Board, source: TileId, dest: TileId) -> Vec<TileId> {
    let search = search_from(board, source, dest, Passage::NO_CITIES);
    if search.reached(dest) {
        return search.path_to(dest);
    }
    search_from(board, source, dest, Passage::ALL).path_to(dest)
}

/// True if the army gathered along the agent's prefix of `path` can take
/// the first tile the agent does not own. Each swamp on the way costs one.
pub fn can_step_path(board: &Board, path: &[TileId]) -> bool {
    if path.len() < 2 {
        return false;
    }
    let mut total = 0i64;
    for &id in path {
        let tile = board.tile(id);
        if tile.is_swamp {
            total -= 1;
        }
        if board.is_self(id) {
            total += i64::from(tile.army - 1);
        } else {
            return i64::from(tile.army) < total;
        }
    }
    true
}

/// Stricter than `can_step_path`: every tile along `path` must be taken
/// under the same running total.
pub fn can_complete_path(board: &Board, path: &[TileId]) -> bool {
    if path.len() < 2 {
        return false;
    }
    let mut total = 0i64;
    for &id in path {
        let tile = board.tile(id);
        if tile.is_swamp {
            total -= 1;
        }
        if board.is_self(id) {
            total += i64::from(tile.army - 1);
        } else if i64::from(tile.army) >= total {
            return false;
        }
    }
    true
}
