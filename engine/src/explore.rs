//! Exploration target tracking.
//!
//! Keeps a stack of fogged tiles worth uncovering, most recently discovered
//! on top. Entries are dropped lazily once the tile they point at has been
//! resolved.

use std::collections::VecDeque;

use crate::board::{Board, TileId, TileKind};

/// Stack of exploration targets plus the turn it was last refreshed.
#[derive(Debug, Clone, Default)]
pub struct ExplorationTracker {
    targets: Vec<TileId>,
    turn_last_updated: u32,
}

impl ExplorationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }

    pub fn turn_last_updated(&self) -> u32 {
        self.turn_last_updated
    }

    /// Pushes `targets` in order, leaving the last element on top.
    pub fn update_list(&mut self, targets: &[TileId], turn: u32) {
        self.targets.extend_from_slice(targets);
        self.turn_last_updated = turn;
    }

    /// True once a refresh is overdue: `turn > 1.5 * last + 30`.
    pub fn is_stale(&self, turn: u32) -> bool {
        f64::from(turn) > 1.5 * f64::from(self.turn_last_updated) + 30.0
    }

    /// Collects fog and fogged obstacles reachable from the agent's land in
    /// discovery order and pushes them onto the stack.
    ///
    /// The flood fill starts from every owned tile at once and does not
    /// expand through mountains.
    pub fn find_exploration_targets(&mut self, board: &Board) {
        let mut visited = vec![false; board.tiles().len()];
        let mut queue: VecDeque<TileId> = VecDeque::new();
        for &id in board.own_tiles() {
            visited[id] = true;
            queue.push_back(id);
        }

        let mut found = Vec::new();
        while let Some(current) = queue.pop_front() {
            for &next in board.tile(current).adjacent() {
                if visited[next] {
                    continue;
                }
                visited[next] = true;
                let tile = board.tile(next);
                if tile.is_mountain() {
                    continue;
                }
                if is_target_of_interest(board, next) {
                    found.push(next);
                }
                queue.push_back(next);
            }
        }

        tracing::debug!(turn = board.turn, count = found.len(), "exploration targets refreshed");
        self.update_list(&found, board.turn);
    }

    /// Returns the current exploration target, refreshing the stack if it is
    /// stale or runs dry.
    pub fn get_target(&mut self, board: &Board) -> Option<TileId> {
        if self.is_stale(board.turn) {
            self.clear();
        }
        if let Some(target) = self.pop_resolved(board) {
            return Some(target);
        }
        self.find_exploration_targets(board);
        self.pop_resolved(board)
    }

    /// Discards resolved entries and returns the top survivor.
    fn pop_resolved(&mut self, board: &Board) -> Option<TileId> {
        while let Some(&top) = self.targets.last() {
            if is_resolved(board, top) {
                self.targets.pop();
            } else {
                return Some(top);
            }
        }
        None
    }
}

fn is_target_of_interest(board: &Board, id: TileId) -> bool {
    let tile = board.tile(id);
    match tile.kind {
        TileKind::Obstacle => !tile.is_city && !tile.is_mountain(),
        TileKind::Fog => !tile.is_general && !tile.is_basic,
        _ => false,
    }
}

fn is_resolved(board: &Board, id: TileId) -> bool {
    let tile = board.tile(id);
    tile.is_city || tile.is_mountain() || tile.is_basic || tile.is_general
}
