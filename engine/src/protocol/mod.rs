//! Wire protocol handling.
//!
//! Decodes the server's run-length diffs and JSON messages, and parses the
//! line-oriented transport commands that carry them.

pub mod diff;
pub mod message;
pub mod parser;

pub use diff::{apply_diff, encode_diff, DiffError};
pub use message::{parse_start, parse_update, GameStart, GameUpdate, MessageError, Score};
pub use parser::{format_move, parse_command, Command, MoveCommand};
