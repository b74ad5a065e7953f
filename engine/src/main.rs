//! Frontline -- a fog-of-war territory bot speaking a line protocol.
//!
//! Reads `start`/`update`/`result` commands from stdin and writes one
//! `move` line per computed move to stdout. Logs go to stderr; set
//! `RUST_LOG` to adjust verbosity.

use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc;
use std::thread;

use tracing_subscriber::EnvFilter;

use frontline::engine::Engine;
use frontline::protocol::{parse_command, Command};
use frontline::session::{self, LineOutbound};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("frontline=info")),
        )
        .with_writer(io::stderr)
        .init();

    let (tx, rx) = mpsc::channel();
    let consumer = match thread::Builder::new()
        .name("update-consumer".into())
        .spawn(move || session::run(Engine::default(), rx, LineOutbound::new(io::stdout())))
    {
        Ok(handle) => handle,
        Err(e) => {
            tracing::error!(error = %e, "failed to spawn session");
            return ExitCode::FAILURE;
        }
    };

    let mut unreadable = false;
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };

        let cmd = match parse_command(&line) {
            Ok(Some(c)) => c,
            Ok(None) => continue,
            Err(e) => {
                tracing::error!(error = %e, "unreadable message, ending session");
                unreadable = true;
                break;
            }
        };

        let quit = matches!(cmd, Command::Quit);
        // A closed channel means the session already ended.
        if tx.send(cmd).is_err() || quit {
            break;
        }
    }
    drop(tx);

    match consumer.join() {
        Ok(Ok(_)) if unreadable => ExitCode::FAILURE,
        Ok(Ok(report)) => {
            tracing::debug!(?report, "exiting");
            ExitCode::SUCCESS
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "session failed");
            ExitCode::FAILURE
        }
        Err(_) => {
            tracing::error!("session thread panicked");
            ExitCode::FAILURE
        }
    }
}
