//! Board representation and game-state types.
//!
//! Contains the tile arena, the per-tile update state machine, the move
//! value, and the viewer snapshot.

pub mod moves;
pub mod snapshot;
pub mod state;
pub mod tile;

pub use moves::Move;
pub use snapshot::{CellView, ViewSnapshot};
pub use state::{Board, GeneralPolicy, Passage, UpdateError, DEFAULT_DIRTY_WINDOW, MAX_PLAYERS};
pub use tile::{PlayerId, Tile, TileId, TileKind};
