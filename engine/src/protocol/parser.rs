//! Line protocol parser.
//!
//! The transport delivers one command per line on stdin:
//!
//! ```text
//! start <json>          game start message
//! update <json>         one tick update
//! result won|lost       game over
//! setoption name <id> [value <x>]
//! view                  request a board snapshot
//! quit
//! ```
//!
//! Moves go back on stdout as `move <row> <col> <row> <col> <0|1>`.

use std::fmt;

use super::message::{parse_start, parse_update, GameStart, GameUpdate, MessageError};
use crate::board::{Board, Move};

/// A parsed transport-to-engine command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start(GameStart),
    Update(GameUpdate),
    /// Game over; `won` is true for a win.
    Result { won: bool },
    /// Set an engine option: `setoption name <id> [value <x>]`.
    SetOption { name: String, value: Option<String> },
    View,
    Quit,
}

/// Parses a single line of input into a `Command`.
///
/// Returns `Ok(None)` for blank lines, unknown commands and malformed
/// arguments, which are logged and skipped. A message body that is not valid
/// JSON is an error: skipping an update would desynchronise the diff caches.
pub fn parse_command(line: &str) -> Result<Option<Command>, MessageError> {
    let trimmed = line.trim();
    let (head, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (trimmed, ""),
    };

    let cmd = match head {
        "" => None,
        "start" => Some(Command::Start(parse_start(rest)?)),
        "update" => Some(Command::Update(parse_update(rest)?)),
        "result" => parse_result(rest),
        "setoption" => parse_setoption(rest),
        "view" => Some(Command::View),
        "quit" => Some(Command::Quit),
        other => {
            tracing::warn!(command = other, "unknown command");
            None
        }
    };
    Ok(cmd)
}

/// Parses `result won|lost`.
fn parse_result(rest: &str) -> Option<Command> {
    match rest {
        "won" | "win" => Some(Command::Result { won: true }),
        "lost" | "lose" => Some(Command::Result { won: false }),
        other => {
            tracing::warn!(value = other, "malformed result: expected 'result won|lost'");
            None
        }
    }
}

/// Parses `name <id> [value <x>]`.
fn parse_setoption(rest: &str) -> Option<Command> {
    let tokens: Vec<&str> = rest.split_whitespace().collect();
    if tokens.len() < 2 || tokens[0] != "name" {
        tracing::warn!("malformed setoption: expected 'setoption name <id> [value <x>]'");
        return None;
    }

    let (name, value) = match tokens.iter().position(|&t| t == "value") {
        Some(vi) => {
            let name = tokens[1..vi].join(" ");
            let value = tokens[vi + 1..].join(" ");
            (name, (!value.is_empty()).then_some(value))
        }
        None => (tokens[1..].join(" "), None),
    };
    if name.is_empty() {
        tracing::warn!("malformed setoption: empty name");
        return None;
    }
    Some(Command::SetOption { name, value })
}

/// A move in grid coordinates, ready to be written to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveCommand {
    /// `(row, col)` of the moving army.
    pub source: (usize, usize),
    pub dest: (usize, usize),
    pub halve: bool,
}

impl fmt::Display for MoveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "move {} {} {} {} {}",
            self.source.0,
            self.source.1,
            self.dest.0,
            self.dest.1,
            u8::from(self.halve)
        )
    }
}

/// Converts a tile-id move to grid coordinates.
pub fn format_move(board: &Board, mv: &Move) -> MoveCommand {
    MoveCommand {
        source: board.tile(mv.source).coords(),
        dest: board.tile(mv.dest).coords(),
        halve: mv.halve,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_quit_and_view() {
        assert_eq!(parse_command("quit").unwrap(), Some(Command::Quit));
        assert_eq!(parse_command("  view  ").unwrap(), Some(Command::View));
    }

    #[test]
    fn parse_empty_line_returns_none() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command("\t").unwrap(), None);
    }

    #[test]
    fn parse_unknown_command_returns_none() {
        assert_eq!(parse_command("foobar 1 2").unwrap(), None);
    }

    #[test]
    fn parse_start_line() {
        let cmd = parse_command(r#"start {"playerIndex":1,"swamps":[3]}"#)
            .unwrap()
            .unwrap();
        match cmd {
            Command::Start(start) => {
                assert_eq!(start.player_index, 1);
                assert_eq!(start.swamps, vec![3]);
            }
            other => panic!("expected start, got {:?}", other),
        }
    }

    #[test]
    fn parse_update_line() {
        let cmd = parse_command(r#"update {"turn":2,"map_diff":[0,4,2,2,0,0]}"#)
            .unwrap()
            .unwrap();
        match cmd {
            Command::Update(update) => {
                assert_eq!(update.turn, 2);
                assert_eq!(update.map_diff, vec![0, 4, 2, 2, 0, 0]);
                assert!(update.cities_diff.is_empty());
            }
            other => panic!("expected update, got {:?}", other),
        }
    }

    #[test]
    fn malformed_update_is_an_error() {
        assert!(parse_command("update {\"turn\":").is_err());
        assert!(parse_command("update").is_err());
    }

    #[test]
    fn parse_result_line() {
        assert_eq!(
            parse_command("result won").unwrap(),
            Some(Command::Result { won: true })
        );
        assert_eq!(
            parse_command("result lost").unwrap(),
            Some(Command::Result { won: false })
        );
        assert_eq!(parse_command("result maybe").unwrap(), None);
    }

    #[test]
    fn parse_setoption_with_value() {
        let cmd = parse_command("setoption name DoNotAttack value 1,2").unwrap();
        assert_eq!(
            cmd,
            Some(Command::SetOption {
                name: "DoNotAttack".to_string(),
                value: Some("1,2".to_string()),
            })
        );
    }

    #[test]
    fn parse_setoption_no_value() {
        let cmd = parse_command("setoption name DoNotAttack").unwrap();
        assert_eq!(
            cmd,
            Some(Command::SetOption {
                name: "DoNotAttack".to_string(),
                value: None,
            })
        );
    }

    #[test]
    fn parse_setoption_malformed_returns_none() {
        assert_eq!(parse_command("setoption").unwrap(), None);
        assert_eq!(parse_command("setoption foo").unwrap(), None);
        assert_eq!(parse_command("setoption name value 3").unwrap(), None);
    }

    #[test]
    fn move_command_format() {
        let board = Board::new(3, 4, 0);
        let mv = Move::new(5, 6, true);
        let cmd = format_move(&board, &mv);
        assert_eq!(cmd.source, (1, 1));
        assert_eq!(cmd.dest, (1, 2));
        assert_eq!(cmd.to_string(), "move 1 1 1 2 1");
        assert_eq!(
            format_move(&board, &Move::new(0, 4, false)).to_string(),
            "move 0 0 1 0 0"
        );
    }
}
