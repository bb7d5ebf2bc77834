//! Error types used throughout the crate.
//!
//! Decode-level and move-level problems are recoverable: a malformed frame is
//! dropped and the next one is tried, and a delta that no legal move explains
//! is simply reported as `None` by the reconciliation engine rather than as
//! an error. Connection errors are surfaced to the session, which turns them
//! into a disconnect and a `Disconnected` event.

use std::io;

use thiserror::Error;

use crate::game_state::chess_types::Square;

/// A raw sensor frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PositionError {
    /// The frame did not contain exactly eight bytes.
    #[error("physical position frames are 8 bytes long, got {len}")]
    InvalidLength { len: usize },
}

/// Failures of the serial link to the board.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// No board device was found at the requested location.
    #[error("no board driver available: {0}")]
    MissingDriver(String),

    /// The device exists but the process may not open it.
    #[error("no permission to open the board device: {0}")]
    PermissionDenied(String),

    #[error("board I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Failures inside the legal-move oracle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveGenerationError {
    /// The position is internally inconsistent (missing piece, bad flags).
    #[error("invalid game state: {0}")]
    InvalidState(String),

    /// A move that is not legal in the position was submitted for application.
    #[error("illegal move {from}->{to}")]
    IllegalMove { from: Square, to: Square },
}

pub type MoveGenResult<T> = Result<T, MoveGenerationError>;

/// FEN, coordinate and SAN text that could not be parsed or produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("invalid square: {0}")]
    InvalidSquare(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("cannot describe move: {0}")]
    InvalidMove(String),

    #[error(transparent)]
    MoveGeneration(#[from] MoveGenerationError),
}

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for option '{name}'")]
    InvalidValue { name: String, value: String },
}

/// The session thread is no longer running.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("board session has stopped")]
    Stopped,
}
