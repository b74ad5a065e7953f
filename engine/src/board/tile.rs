//! Tile types and per-tile state.
//!
//! A tile's kind is a single tagged enum decoded from the server's tile
//! code. City, general, swamp and mountain knowledge are orthogonal flags
//! because they outlive the tile's current visibility.

use std::time::{Duration, Instant};

/// Index of a tile in the board's row-major arena.
pub type TileId = usize;

/// A player's index as assigned by the server.
pub type PlayerId = usize;

/// Server tile code for an empty, neutral tile.
pub const CODE_EMPTY: i32 = -1;
/// Server tile code for a tile hidden by fog.
pub const CODE_FOG: i32 = -2;
/// Server tile code for a fogged obstacle (mountain or city, unconfirmed).
pub const CODE_OBSTACLE: i32 = -3;
/// Server tile code for a visible mountain.
pub const CODE_MOUNTAIN: i32 = -4;

/// What currently occupies a tile, as far as the agent knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileKind {
    Fog,
    Obstacle,
    Mountain,
    Empty,
    Owned(PlayerId),
}

impl TileKind {
    /// Decodes a server tile code. Returns `None` for codes outside the protocol.
    pub fn from_code(code: i32) -> Option<TileKind> {
        match code {
            CODE_EMPTY => Some(TileKind::Empty),
            CODE_FOG => Some(TileKind::Fog),
            CODE_OBSTACLE => Some(TileKind::Obstacle),
            CODE_MOUNTAIN => Some(TileKind::Mountain),
            c if c >= 0 => Some(TileKind::Owned(c as PlayerId)),
            _ => None,
        }
    }

    /// Returns the server tile code for this kind.
    pub const fn code(self) -> i32 {
        match self {
            TileKind::Empty => CODE_EMPTY,
            TileKind::Fog => CODE_FOG,
            TileKind::Obstacle => CODE_OBSTACLE,
            TileKind::Mountain => CODE_MOUNTAIN,
            TileKind::Owned(p) => p as i32,
        }
    }

    /// Returns the owning player, if any.
    pub const fn owner(self) -> Option<PlayerId> {
        match self {
            TileKind::Owned(p) => Some(p),
            _ => None,
        }
    }

    /// True if the tile is currently in view: empty, mountain, or owned.
    pub const fn is_visible(self) -> bool {
        matches!(
            self,
            TileKind::Empty | TileKind::Mountain | TileKind::Owned(_)
        )
    }

    /// True for fog and fogged obstacles.
    pub const fn is_unexplored(self) -> bool {
        matches!(self, TileKind::Fog | TileKind::Obstacle)
    }
}

/// A single grid cell and everything the agent remembers about it.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    /// Column.
    pub x: usize,
    /// Row.
    pub y: usize,
    pub kind: TileKind,
    pub army: i32,
    pub is_city: bool,
    pub is_general: bool,
    pub is_swamp: bool,
    /// Seen as a mountain at least once.
    pub is_mountain: bool,
    /// Seen in the open as a plain tile: not a city, general, mountain or swamp.
    pub is_basic: bool,
    pub turn_captured: u32,
    /// Last turn the agent owned this tile; 0 if never.
    pub turn_held: u32,
    pub turn_first_seen: Option<u32>,
    pub(crate) general_of: Option<PlayerId>,
    pub(crate) dirty_at: Option<Instant>,
    pub(crate) neighbors: Vec<TileId>,
}

impl Tile {
    /// Creates a fogged tile at `(row, col)` with no adjacency yet.
    pub(crate) fn fogged(id: TileId, row: usize, col: usize) -> Self {
        Tile {
            id,
            x: col,
            y: row,
            kind: TileKind::Fog,
            army: 0,
            is_city: false,
            is_general: false,
            is_swamp: false,
            is_mountain: false,
            is_basic: false,
            turn_captured: 0,
            turn_held: 0,
            turn_first_seen: None,
            general_of: None,
            dirty_at: None,
            neighbors: Vec::with_capacity(4),
        }
    }

    /// Returns `(row, col)`.
    pub const fn coords(&self) -> (usize, usize) {
        (self.y, self.x)
    }

    pub const fn owner(&self) -> Option<PlayerId> {
        self.kind.owner()
    }

    pub fn is_empty(&self) -> bool {
        self.kind == TileKind::Empty
    }

    /// True if the tile is, or was ever seen to be, a mountain.
    pub fn is_mountain(&self) -> bool {
        self.kind == TileKind::Mountain || self.is_mountain
    }

    /// Manhattan distance to another tile.
    pub fn distance_to(&self, other: &Tile) -> usize {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// All in-bounds 4-connected neighbours, unfiltered.
    pub fn adjacent(&self) -> &[TileId] {
        &self.neighbors
    }

    /// True while a locally-predicted update is awaiting server confirmation.
    pub fn is_dirty(&self, window: Duration) -> bool {
        self.dirty_at.is_some_and(|at| at.elapsed() < window)
    }
}
