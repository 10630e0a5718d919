//! Errors used throughout the chess engine.
//!
//! `ChessError` is the single error type for the fallible surfaces of the
//! crate: text parsing (FEN, long algebraic), opening-book construction,
//! engine options and the search worker channel.
//!
//! Interactive rule violations are not represented here. The
//! rules state machine answers an illegal input with the unchanged position,
//! and an aborted search is a normal outcome that still yields a move.

use thiserror::Error;

pub type ChessResult<T> = Result<T, ChessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// A square index outside `0..=63`.
    #[error("square index {0} is off the board")]
    InvalidSquare(u8),

    /// A coordinate or move string that could not be interpreted.
    #[error("invalid algebraic notation '{0}'")]
    InvalidAlgebraic(String),

    /// A FEN string with malformed structure or tokens.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    /// A move referenced an empty origin square.
    #[error("no piece on square {0}")]
    EmptySquare(String),

    /// A move that is not legal in the given position.
    #[error("illegal move {0}")]
    IllegalMove(String),

    /// An opening-book line that does not replay from the start position.
    #[error("opening book line '{line}' is invalid: {reason}")]
    InvalidBookLine { line: String, reason: String },

    #[error("unknown engine option '{0}'")]
    UnknownOption(String),

    #[error("invalid value '{value}' for engine option '{name}'")]
    InvalidOptionValue { name: String, value: String },

    /// The search worker thread is gone and can no longer answer requests.
    #[error("search worker disconnected")]
    WorkerDisconnected,

    #[error("failed to spawn search worker: {0}")]
    WorkerSpawn(String),
}
