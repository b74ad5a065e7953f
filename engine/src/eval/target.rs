//! Nearest-target scoring.
//!
//! Every attackable tile gets a weighted distance from the source army;
//! the smallest weighted distance wins. Weights pull the agent toward
//! generals and affordable cities and push it away from swamps, empty land
//! and armies larger than its own.

use crate::board::{Board, TileId, TileKind};

const GENERAL_WEIGHT: f64 = 0.09;
const CITY_RATIO_SCALE: f64 = 3.2;
const CITY_WEIGHT_MIN: f64 = 0.17;
const CITY_WEIGHT_MAX: f64 = 20.0;
const EMPTY_CITY_WEIGHT: f64 = 1.6;
const EMPTY_WEIGHT: f64 = 4.3;
const STRONGER_WEIGHT: f64 = 1.6;
const SWAMP_WEIGHT: f64 = 10.0;
const HELD_SWAMP_WEIGHT: f64 = 3.0;

/// Weighted distance from `source` to `target`. Smaller is more attractive.
pub fn target_score(board: &Board, source: TileId, target: TileId) -> f64 {
    let src = board.tile(source);
    let tile = board.tile(target);
    let src_army = f64::from(src.army.max(1));
    let army = f64::from(tile.army);

    let mut score = src.distance_to(tile) as f64;
    if tile.is_general {
        score *= GENERAL_WEIGHT;
    } else if tile.is_city {
        score *= (army / (CITY_RATIO_SCALE * src_army)).clamp(CITY_WEIGHT_MIN, CITY_WEIGHT_MAX);
    }
    if tile.kind == TileKind::Empty {
        score *= if tile.is_city { EMPTY_CITY_WEIGHT } else { EMPTY_WEIGHT };
    }
    if tile.army > src.army {
        score *= STRONGER_WEIGHT * army / src_army;
    }
    if tile.is_swamp {
        score *= SWAMP_WEIGHT;
        if tile.turn_held > 0 {
            score *= HELD_SWAMP_WEIGHT;
        }
    }
    score
}

/// Picks the attackable tile with the smallest weighted distance from
/// `source`, scanning in row-major order. Ties keep the first tile seen.
///
/// Tiles holding more than `4 * army + 14` are out of reach and skipped.
pub fn nearest_target_tile(board: &Board, source: TileId) -> Option<TileId> {
    if !board.is_self(source) {
        return None;
    }
    let max_army = board.tile(source).army.saturating_mul(4).saturating_add(14);

    let mut best: Option<(TileId, f64)> = None;
    for tile in board.tiles() {
        if !board.should_attack(tile.id) || tile.army > max_army {
            continue;
        }
        let score = target_score(board, source, tile.id);
        if best.map_or(true, |(_, s)| score < s) {
            best = Some((tile.id, score));
        }
    }
    best.map(|(id, _)| id)
}
