//! Single-threaded driver for a [`LiBoard`].
//!
//! The session thread is the only place board state changes. Frames from the
//! reader thread, commands from any number of [`SessionHandle`]s and the one
//! pending move-confirmation deadline are multiplexed with `select!`; a newer
//! frame replaces the deadline instead of queueing another reconciliation.

use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{at, bounded, never, select, unbounded, Receiver, Sender};
use log::{debug, error, info};

use crate::board::events::BoardEvent;
use crate::board::liboard::{LiBoard, Observation};
use crate::board::physical_position::{PhysicalPosition, SquareSet};
use crate::connection::serial_connection::{Connection, ConnectionMessage};
use crate::errors::SessionError;
use crate::game_state::game_state::GameState;
use crate::game_state::move_ledger::GameOutcome;
use crate::move_generation::move_oracle::MoveOracle;

pub enum SessionCommand {
    Connect(Connection),
    Disconnect,
    Takeback,
    /// Replies whether the clock may switch.
    ClockSwitch(Sender<bool>),
    NewGame,
    Subscribe(Sender<Receiver<BoardEvent>>),
    Snapshot(Sender<BoardSnapshot>),
    Shutdown,
}

/// Copy of the board state for UI queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardSnapshot {
    pub game_state: GameState,
    pub san_moves: Vec<String>,
    pub known_position: PhysicalPosition,
    pub physical_position: PhysicalPosition,
    pub lifted_pieces: SquareSet,
    pub outcome: GameOutcome,
    pub connected: bool,
    pub pgn: String,
}

impl BoardSnapshot {
    fn of<O: MoveOracle>(board: &LiBoard<O>) -> Self {
        Self {
            game_state: board.game_state().clone(),
            san_moves: board.ledger().san_moves().map(str::to_owned).collect(),
            known_position: board.known_position(),
            physical_position: board.physical_position(),
            lifted_pieces: board.lifted_pieces().squares(),
            outcome: board.outcome(),
            connected: board.is_connected(),
            pgn: board.to_pgn(),
        }
    }

    /// Whether the pieces on the board match the logical position.
    pub fn in_sync(&self) -> bool {
        self.known_position == self.physical_position
    }
}

/// Cloneable sender side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: Sender<SessionCommand>,
}

impl SessionHandle {
    fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Stopped)
    }

    fn request<T>(&self, command: impl FnOnce(Sender<T>) -> SessionCommand) -> Result<T, SessionError> {
        let (tx, rx) = bounded(1);
        self.send(command(tx))?;
        rx.recv().map_err(|_| SessionError::Stopped)
    }

    pub fn connect(&self, connection: Connection) -> Result<(), SessionError> {
        self.send(SessionCommand::Connect(connection))
    }

    pub fn disconnect(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Disconnect)
    }

    pub fn takeback(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Takeback)
    }

    pub fn clock_switch(&self) -> Result<bool, SessionError> {
        self.request(SessionCommand::ClockSwitch)
    }

    pub fn new_game(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::NewGame)
    }

    pub fn subscribe(&self) -> Result<Receiver<BoardEvent>, SessionError> {
        self.request(SessionCommand::Subscribe)
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot, SessionError> {
        self.request(SessionCommand::Snapshot)
    }

    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.send(SessionCommand::Shutdown)
    }
}

pub struct BoardSession<O: MoveOracle> {
    board: LiBoard<O>,
    connection: Option<Connection>,
    commands: Receiver<SessionCommand>,
    deadline: Option<Instant>,
}

impl<O: MoveOracle + 'static> BoardSession<O> {
    pub fn new(board: LiBoard<O>) -> (Self, SessionHandle) {
        let (tx, rx) = unbounded();
        let session = Self {
            board,
            connection: None,
            commands: rx,
            deadline: None,
        };
        (session, SessionHandle { commands: tx })
    }

    /// Runs the session on its own thread.
    pub fn spawn(board: LiBoard<O>) -> std::io::Result<(SessionHandle, JoinHandle<()>)> {
        let (session, handle) = Self::new(board);
        let join = thread::Builder::new()
            .name("liboard-session".to_owned())
            .spawn(move || session.run())?;
        Ok((handle, join))
    }

    /// Processes messages until shut down or until every handle is dropped.
    pub fn run(mut self) {
        let commands = self.commands.clone();
        loop {
            let frames = match &self.connection {
                Some(connection) => connection.messages().clone(),
                None => never(),
            };
            let timeout = match self.deadline {
                Some(deadline) => at(deadline),
                None => never(),
            };

            select! {
                recv(commands) -> command => match command {
                    Ok(SessionCommand::Shutdown) | Err(_) => break,
                    Ok(command) => self.handle_command(command),
                },
                recv(frames) -> message => match message {
                    Ok(ConnectionMessage::Frame(frame)) => self.observe_frame(&frame),
                    Ok(ConnectionMessage::Failed(err)) => {
                        error!("connection failed: {err}");
                        self.disconnect();
                    }
                    Ok(ConnectionMessage::Closed) | Err(_) => {
                        info!("board stream ended");
                        self.disconnect();
                    }
                },
                recv(timeout) -> _ => {
                    self.deadline = None;
                    self.board.generate_move();
                },
            }
        }

        self.disconnect();
        debug!("session stopped");
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Connect(connection) => {
                self.disconnect();
                info!("board attached on {}", connection.name());
                self.connection = Some(connection);
                self.board.on_connected();
            }
            SessionCommand::Disconnect => self.disconnect(),
            SessionCommand::Takeback => {
                self.board.takeback();
            }
            SessionCommand::ClockSwitch(reply) => {
                let _ = reply.send(self.board.try_clock_switch());
            }
            SessionCommand::NewGame => {
                self.deadline = None;
                self.board.new_game();
            }
            SessionCommand::Subscribe(reply) => {
                let _ = reply.send(self.board.subscribe());
            }
            SessionCommand::Snapshot(reply) => {
                let _ = reply.send(BoardSnapshot::of(&self.board));
            }
            SessionCommand::Shutdown => {}
        }
    }

    fn observe_frame(&mut self, frame: &[u8]) {
        self.deadline = match self.board.on_new_frame(frame) {
            None => return,
            Some(Observation::ReconcileAfter(delay)) if delay.is_zero() => {
                self.board.generate_move();
                None
            }
            Some(Observation::ReconcileAfter(delay)) => Some(Instant::now() + delay),
            Some(Observation::GameStarted) | Some(Observation::AwaitingConfirmation) => None,
        };
    }

    fn disconnect(&mut self) {
        if let Some(connection) = self.connection.take() {
            connection.close();
            self.board.on_disconnected();
        }
    }
}
