//! Path planning.
//!
//! Breadth-first searches over the tile graph: the capture-aware forward
//! search, swamp escape routes, and the reverse approach search used for
//! exploration.

pub mod approach;
pub mod path;
pub mod swamp;

pub use approach::step_toward_me;
pub use path::{can_complete_path, can_step_path, path_to, search_from, PathSearch};
pub use swamp::{get_best_swamp_path, get_swamp_paths, SwampPath};
