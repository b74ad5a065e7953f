//! Swamp escape paths.
//!
//! A swamp drains the army standing on it, so an army caught in one wants
//! the cheapest way out. The search walks only through swamp tiles and
//! records every exit onto a tile the team does not hold.

use std::collections::VecDeque;

use crate::board::{Board, TileId};

/// A route out of a swamp region, ending on a non-swamp tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwampPath {
    pub path: Vec<TileId>,
    /// Army spent on the way: two per swamp tile crossed, plus two for the
    /// step out.
    pub cost: i32,
}

impl SwampPath {
    pub fn exit(&self) -> TileId {
        self.path[self.path.len() - 1]
    }
}

/// Enumerates exits from the swamp region around `source`, shortest first,
/// keeping those whose cost fits within `budget`.
pub fn get_swamp_paths(board: &Board, source: TileId, budget: i32) -> Vec<SwampPath> {
    let size = board.tiles().len();
    let mut came_from: Vec<Option<TileId>> = vec![None; size];
    let mut depth = vec![0i32; size];
    let mut visited = vec![false; size];
    let mut queue = VecDeque::new();
    let mut paths = Vec::new();

    visited[source] = true;
    queue.push_back(source);

    while let Some(current) = queue.pop_front() {
        let exit_cost = 2 * (depth[current] + 1);
        for &next in board.tile(current).adjacent() {
            let tile = board.tile(next);
            if visited[next] || tile.is_mountain() {
                continue;
            }
            visited[next] = true;
            came_from[next] = Some(current);

            if tile.is_swamp {
                depth[next] = depth[current] + 1;
                if 2 * (depth[next] + 1) <= budget {
                    queue.push_back(next);
                }
            } else if !board.is_on_team(next) && exit_cost <= budget {
                paths.push(SwampPath {
                    path: reconstruct(&came_from, source, next),
                    cost: exit_cost,
                });
            }
        }
    }
    paths
}

fn reconstruct(came_from: &[Option<TileId>], source: TileId, dest: TileId) -> Vec<TileId> {
    let mut path = vec![dest];
    let mut current = dest;
    while current != source {
        match came_from[current] {
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

/// Picks the best exit for the army on `source`.
///
/// Preference order: the shortest exit onto a city or empty tile the army
/// can still take after paying the crossing; then the shortest exit into
/// unexplored territory; then the shortest exit of any kind.
pub fn get_best_swamp_path(board: &Board, source: TileId) -> Option<SwampPath> {
    let army = board.tile(source).army;
    let paths = get_swamp_paths(board, source, army);

    let capture = paths.iter().find(|p| {
        let exit = board.tile(p.exit());
        (exit.is_city || exit.is_empty()) && exit.army < army - p.cost
    });
    if let Some(p) = capture {
        return Some(p.clone());
    }

    let explore = paths.iter().find(|p| {
        let exit = board.tile(p.exit());
        exit.kind.is_unexplored() && !exit.is_mountain()
    });
    if let Some(p) = explore {
        return Some(p.clone());
    }

    paths.into_iter().next()
}
