//! Integration tests for the frontline binary.
//!
//! Spawns the engine process, feeds it a game over stdin, and checks the
//! move lines it writes to stdout.

use std::io::{BufRead, Write};
use std::process::{Command, ExitStatus, Stdio};

use frontline::protocol::encode_diff;

const FOG: i32 = -2;
const EMPTY: i32 = -1;

/// Sends a sequence of lines to the engine and collects stdout.
fn run_engine(lines: &[String]) -> (Vec<String>, ExitStatus) {
    let exe = env!("CARGO_BIN_EXE_frontline");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to start frontline");

    let mut stdin = child.stdin.take().unwrap();
    let stdout = child.stdout.take().unwrap();
    let reader = std::io::BufReader::new(stdout);

    for line in lines {
        // The engine may exit early and close its end of the pipe.
        if writeln!(stdin, "{}", line).is_err() {
            break;
        }
    }
    let _ = stdin.flush();
    drop(stdin);

    let out: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
    let status = child.wait().expect("failed to wait on child");
    (out, status)
}

fn moves(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .filter(|l| l.starts_with("move "))
        .map(String::as_str)
        .collect()
}

/// Flat server buffer: `cols, rows, armies.., codes..`.
fn buffer(rows: usize, cols: usize, cells: &[(i32, i32)]) -> Vec<i32> {
    let mut buf = vec![cols as i32, rows as i32];
    buf.extend(cells.iter().map(|&(army, _)| army));
    buf.extend(cells.iter().map(|&(_, code)| code));
    buf
}

fn start_line() -> String {
    r#"start {"playerIndex":0,"usernames":["me","them"],"swamps":[]}"#.to_string()
}

fn update_line(turn: u32, old: &[i32], new: &[i32], generals: &[i32]) -> String {
    let body = serde_json::json!({
        "turn": turn,
        "map_diff": encode_diff(old, new),
        "cities_diff": [0],
        "generals": generals,
        "scores": [],
    });
    format!("update {}", body)
}

/// 3x3 board: own general with 5 at (1,1), enemy 3 at (1,2), fog elsewhere.
fn opening() -> Vec<i32> {
    let mut cells = vec![(0, FOG); 9];
    cells[4] = (5, 0);
    cells[5] = (3, 1);
    buffer(3, 3, &cells)
}

#[test]
fn first_update_yields_capture() {
    let (out, status) = run_engine(&[
        start_line(),
        update_line(1, &[], &opening(), &[4, -1]),
        "quit".to_string(),
    ]);
    assert!(status.success());
    assert_eq!(moves(&out), vec!["move 1 1 1 2 0"]);
}

#[test]
fn consecutive_updates_use_latest_board() {
    let first = opening();
    let mut cells = vec![(0, FOG); 9];
    cells[4] = (1, 0);
    cells[5] = (2, 0);
    cells[8] = (0, EMPTY);
    let second = buffer(3, 3, &cells);

    let (out, status) = run_engine(&[
        start_line(),
        update_line(1, &[], &first, &[4, -1]),
        update_line(2, &first, &second, &[4, -1]),
        "quit".to_string(),
    ]);
    assert!(status.success());
    let moves = moves(&out);
    // Updates may coalesce, but the last move always sees the second board.
    assert!(!moves.is_empty() && moves.len() <= 2, "moves: {:?}", moves);
    assert_eq!(moves.last(), Some(&"move 1 2 2 2 0"));
    if moves.len() == 2 {
        assert_eq!(moves[0], "move 1 1 1 2 0");
    }
}

#[test]
fn view_reports_snapshot() {
    let (out, status) = run_engine(&[
        start_line(),
        update_line(1, &[], &opening(), &[4, -1]),
        "view".to_string(),
        "quit".to_string(),
    ]);
    assert!(status.success());
    let view = out
        .iter()
        .find_map(|l| l.strip_prefix("view "))
        .expect("no view line");
    let json: serde_json::Value = serde_json::from_str(view).unwrap();
    assert_eq!(json["rows"], 3);
    assert_eq!(json["cols"], 3);
    assert_eq!(json["cells"].as_array().unwrap().len(), 9);
}

#[test]
fn malformed_update_is_fatal() {
    let (out, status) = run_engine(&[
        start_line(),
        "update {\"turn\":1,\"map_diff\":[0,".to_string(),
        "quit".to_string(),
    ]);
    assert!(moves(&out).is_empty());
    assert!(!status.success());
}

#[test]
fn truncated_diff_ends_session_with_failure() {
    let (out, status) = run_engine(&[
        start_line(),
        r#"update {"turn":1,"map_diff":[0,5,3,3]}"#.to_string(),
        "quit".to_string(),
    ]);
    assert!(moves(&out).is_empty());
    assert!(!status.success());
}

#[test]
fn result_ends_game() {
    let (out, status) = run_engine(&[
        start_line(),
        "result won".to_string(),
        update_line(1, &[], &opening(), &[4, -1]),
    ]);
    assert!(status.success());
    assert!(moves(&out).is_empty());
}

#[test]
fn blank_and_unknown_lines_are_ignored() {
    let (out, status) = run_engine(&[
        String::new(),
        "hello there".to_string(),
        "setoption name Bogus value 1".to_string(),
        start_line(),
        update_line(1, &[], &opening(), &[4, -1]),
        "quit".to_string(),
    ]);
    assert!(status.success());
    assert_eq!(moves(&out).len(), 1);
}
