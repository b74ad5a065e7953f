//! Frontline engine library.
//!
//! Exposes the board model, path planning, move selection, and protocol
//! modules for use by integration tests and the binary entry point.

pub mod board;
pub mod config;
pub mod engine;
pub mod eval;
pub mod explore;
pub mod movegen;
pub mod protocol;
pub mod search;
pub mod session;
