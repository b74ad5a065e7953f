//! Target evaluation.
//!
//! Scores attackable tiles relative to a source army.

pub mod target;

pub use target::{nearest_target_tile, target_score};
