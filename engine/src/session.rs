//! Game session threading.
//!
//! Three threads cooperate per session:
//!
//! - the transport thread (the caller) reads commands and forwards them
//!   over a channel;
//! - the update consumer applies each command to the engine and raises the
//!   move gate after every board update;
//! - the move producer waits on the gate, computes one move against the
//!   latest board and writes it out.
//!
//! The gate is a single-slot flag, so updates that arrive while a move is
//! being computed coalesce into one further computation.

use std::io::{self, Write};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::board::ViewSnapshot;
use crate::engine::{Engine, EngineError};
use crate::protocol::{Command, MoveCommand};

/// Where the session writes its output.
pub trait Outbound: Send {
    fn send_move(&mut self, cmd: &MoveCommand) -> io::Result<()>;
    fn send_view(&mut self, view: &ViewSnapshot) -> io::Result<()>;
}

/// Writes moves and views as protocol lines, flushing after each.
pub struct LineOutbound<W> {
    writer: W,
}

impl<W: Write + Send> LineOutbound<W> {
    pub fn new(writer: W) -> Self {
        LineOutbound { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Outbound for LineOutbound<W> {
    fn send_move(&mut self, cmd: &MoveCommand) -> io::Result<()> {
        writeln!(self.writer, "{}", cmd)?;
        self.writer.flush()
    }

    fn send_view(&mut self, view: &ViewSnapshot) -> io::Result<()> {
        let json = serde_json::to_string(view)?;
        writeln!(self.writer, "view {}", json)?;
        self.writer.flush()
    }
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("output failed: {0}")]
    Io(#[from] io::Error),

    #[error("move producer panicked")]
    ProducerPanicked,
}

/// Summary of a finished session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionReport {
    pub updates: u64,
    pub moves: u64,
    pub won: Option<bool>,
}

#[derive(Debug, Default)]
struct GateState {
    pending: bool,
    closed: bool,
}

/// Single-slot signal between the update consumer and the move producer.
#[derive(Debug, Default)]
pub struct MoveGate {
    state: Mutex<GateState>,
    ready: Condvar,
}

impl MoveGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, GateState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks a move as wanted. Repeated signals before the producer wakes
    /// collapse into one.
    pub fn signal(&self) {
        self.lock().pending = true;
        self.ready.notify_one();
    }

    /// Stops the producer once any pending signal has been served.
    pub fn close(&self) {
        self.lock().closed = true;
        self.ready.notify_all();
    }

    /// Blocks until a move is wanted, consuming the signal. Returns false
    /// once the gate is closed and nothing is pending.
    pub fn wait(&self) -> bool {
        let mut state = self.lock();
        loop {
            if state.pending {
                state.pending = false;
                return true;
            }
            if state.closed {
                return false;
            }
            state = self
                .ready
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Runs one session until the channel closes, the game ends, or an update
/// cannot be applied.
///
/// Spawns the move producer, consumes `commands` on the calling thread, and
/// joins the producer before returning.
pub fn run<O: Outbound + 'static>(
    engine: Engine,
    commands: Receiver<Command>,
    out: O,
) -> Result<SessionReport, SessionError> {
    let engine = Arc::new(Mutex::new(engine));
    let out = Arc::new(Mutex::new(out));
    let gate = Arc::new(MoveGate::new());

    let producer = {
        let engine = Arc::clone(&engine);
        let out = Arc::clone(&out);
        let gate = Arc::clone(&gate);
        thread::Builder::new()
            .name("move-producer".into())
            .spawn(move || produce_moves(&engine, &out, &gate))?
    };

    let consumed = consume_updates(&engine, &out, &gate, commands);
    gate.close();
    let moves = producer.join().map_err(|_| SessionError::ProducerPanicked)?;

    let mut report = consumed?;
    report.moves = moves?;
    tracing::info!(
        updates = report.updates,
        moves = report.moves,
        won = ?report.won,
        "session finished"
    );
    Ok(report)
}

fn produce_moves<O: Outbound>(
    engine: &Mutex<Engine>,
    out: &Mutex<O>,
    gate: &MoveGate,
) -> io::Result<u64> {
    let mut sent = 0;
    while gate.wait() {
        let cmd = lock(engine).next_move_command();
        if let Some(cmd) = cmd {
            lock(out).send_move(&cmd)?;
            sent += 1;
        }
    }
    Ok(sent)
}

fn consume_updates<O: Outbound>(
    engine: &Mutex<Engine>,
    out: &Mutex<O>,
    gate: &MoveGate,
    commands: Receiver<Command>,
) -> Result<SessionReport, SessionError> {
    let mut report = SessionReport::default();

    for cmd in commands {
        match cmd {
            Command::Start(start) => lock(engine).start_game(start),
            Command::Update(update) => {
                if let Err(e) = lock(engine).apply_update(&update) {
                    tracing::error!(turn = update.turn, error = %e, "update rejected, ending session");
                    return Err(e.into());
                }
                report.updates += 1;
                gate.signal();
            }
            Command::Result { won } => {
                lock(engine).apply_result(won);
                report.won = Some(won);
                break;
            }
            Command::SetOption { name, value } => {
                if let Err(e) = lock(engine).set_option(&name, value.as_deref()) {
                    tracing::warn!(error = %e, "setoption ignored");
                }
            }
            Command::View => {
                let view = lock(engine).snapshot();
                if let Some(view) = view {
                    lock(out).send_view(&view)?;
                }
            }
            Command::Quit => break,
        }
    }
    Ok(report)
}
