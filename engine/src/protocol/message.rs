//! Wire messages delivered by the game server.
//!
//! Messages arrive as JSON objects. `GameStart` is sent once per game;
//! `GameUpdate` once per tick. Field names follow the server's casing.

use serde::{Deserialize, Serialize};

/// Errors produced while decoding a JSON message body.
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("malformed {kind} message: {source}")]
    Json {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// The one-off game start message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStart {
    /// The agent's own player index.
    pub player_index: usize,
    #[serde(default)]
    pub usernames: Vec<String>,
    /// Team id per player index. Absent in free-for-all games.
    #[serde(default)]
    pub teams: Option<Vec<i32>>,
    /// Flat cell indices of swamp tiles.
    #[serde(default)]
    pub swamps: Vec<usize>,
}

/// A single player's score line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Score {
    #[serde(alias = "i")]
    pub index: usize,
    pub total: i64,
    pub tiles: i64,
    #[serde(default)]
    pub dead: bool,
}

/// A per-tick game update.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GameUpdate {
    pub turn: u32,
    pub map_diff: Vec<i32>,
    #[serde(default)]
    pub cities_diff: Vec<i32>,
    /// General cell index per player, `-1` while unknown.
    #[serde(default)]
    pub generals: Vec<i32>,
    #[serde(default)]
    pub scores: Vec<Score>,
}

/// Parses a `GameStart` from its JSON body.
pub fn parse_start(json: &str) -> Result<GameStart, MessageError> {
    serde_json::from_str(json).map_err(|source| MessageError::Json {
        kind: "start",
        source,
    })
}

/// Parses a `GameUpdate` from its JSON body.
pub fn parse_update(json: &str) -> Result<GameUpdate, MessageError> {
    serde_json::from_str(json).map_err(|source| MessageError::Json {
        kind: "update",
        source,
    })
}

/// Returns scores ordered by player index.
///
/// The server sends scores sorted by total; consumers index them by player.
pub fn scores_by_player(scores: &[Score]) -> Vec<Score> {
    let mut ordered = scores.to_vec();
    ordered.sort_by_key(|s| s.index);
    ordered
}
