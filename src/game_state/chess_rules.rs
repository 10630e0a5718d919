//! Canonical chess-rule constants.
//!
//! Starting layout plus the clock parameters used by the interactive rules
//! state machine when no explicit `ClockSettings` are supplied.

use crate::game_state::chess_types::PieceKind;

/// Standard chess starting position in Forsyth-Edwards Notation (FEN).
pub const STARTING_POSITION_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Back-rank layout from the a-file to the h-file.
pub const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const DEFAULT_INITIAL_CLOCK_MS: u64 = 5 * 60 * 1000;
pub const DEFAULT_INCREMENT_MS: u64 = 2_000;
pub const DEFAULT_MAX_BANK_MS: u64 = 10 * 60 * 1000;
