//! Read-only view of the board for external viewers.
//!
//! Viewers receive a serialisable copy once per tick and never hold a
//! reference into the live board.

use serde::Serialize;

use super::state::Board;
use crate::protocol::message::Score;

/// One cell as a viewer draws it.
#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    /// Server tile code.
    pub code: i32,
    pub army: i32,
    pub city: bool,
    pub general: bool,
    pub swamp: bool,
    pub mountain: bool,
}

/// A complete viewer frame.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    pub turn: u32,
    pub rows: usize,
    pub cols: usize,
    pub player_index: usize,
    /// Row-major cells.
    pub cells: Vec<CellView>,
    pub scores: Vec<Score>,
    /// Planned path as `(row, col)` pairs.
    pub path: Vec<(usize, usize)>,
    pub collect_path: Vec<(usize, usize)>,
    pub bottom_text: String,
    pub complete: bool,
    pub won: bool,
}

impl ViewSnapshot {
    pub fn capture(board: &Board) -> Self {
        let cells = board
            .tiles()
            .iter()
            .map(|t| CellView {
                code: t.kind.code(),
                army: t.army,
                city: t.is_city,
                general: t.is_general,
                swamp: t.is_swamp,
                mountain: t.is_mountain(),
            })
            .collect();

        ViewSnapshot {
            turn: board.turn,
            rows: board.rows(),
            cols: board.cols(),
            player_index: board.player_index,
            cells,
            scores: board.scores.clone(),
            path: board.path.iter().map(|&id| board.tile(id).coords()).collect(),
            collect_path: board
                .collect_path
                .iter()
                .map(|&id| board.tile(id).coords())
                .collect(),
            bottom_text: board.bottom_text.clone(),
            complete: board.complete,
            won: board.won,
        }
    }
}
