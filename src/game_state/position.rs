//! Interactive game position.
//!
//! `Position` is the plain-data snapshot exchanged with collaborators: the
//! board, turn, king cache, history, UI selection state, clocks and the game
//! result. It is treated as immutable by the rules state machine in
//! `game_state::transitions`, which always returns a fresh copy.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::errors::ChessResult;
use crate::game_state::chess_rules::{
    DEFAULT_INCREMENT_MS, DEFAULT_INITIAL_CLOCK_MS, DEFAULT_MAX_BANK_MS,
};
use crate::game_state::chess_types::*;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;
use crate::utils::long_algebraic::history_to_long_algebraic;

/// Per-game clock parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClockSettings {
    pub initial_ms: u64,
    /// Added to the mover's clock after each completed move.
    pub increment_ms: u64,
    /// Ceiling the increment can never push a clock above.
    pub max_bank_ms: u64,
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            initial_ms: DEFAULT_INITIAL_CLOCK_MS,
            increment_ms: DEFAULT_INCREMENT_MS,
            max_bank_ms: DEFAULT_MAX_BANK_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub board: Board,
    pub side_to_move: Color,
    /// `[white, black]`, always in sync with the board.
    pub king_squares: [Square; 2],
    pub move_history: Vec<Move>,

    // --- Selection state ---
    pub selected: Option<Square>,
    /// Legal destinations of the selected piece.
    pub legal_destinations: Vec<Square>,
    /// Square of a pawn that reached the last rank and awaits a piece choice.
    pub pending_promotion: Option<Square>,

    // --- Clocks ---
    pub clocks_ms: [u64; 2],
    pub clock: ClockSettings,

    pub result: GameResult,
}

impl Default for Position {
    fn default() -> Self {
        Self::new_game()
    }
}

impl Position {
    #[inline]
    pub fn new_game() -> Self {
        Self::new_game_with_clock(ClockSettings::default())
    }

    pub fn new_game_with_clock(clock: ClockSettings) -> Self {
        Self::from_board(Board::starting(), Color::White, clock)
    }

    /// Wrap a board into a fresh position with no history or selection.
    ///
    /// King squares are read from the board; a board without a king for some
    /// side is not a valid position, and its cache defaults to square 0.
    pub fn from_board(board: Board, side_to_move: Color, clock: ClockSettings) -> Self {
        let king_squares = [
            board.king_square(Color::White).unwrap_or_default(),
            board.king_square(Color::Black).unwrap_or_default(),
        ];
        Self {
            board,
            side_to_move,
            king_squares,
            move_history: Vec::new(),
            selected: None,
            legal_destinations: Vec::new(),
            pending_promotion: None,
            clocks_ms: [clock.initial_ms; 2],
            clock,
            result: GameResult::None,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> ChessResult<Self> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn clock_ms(&self, color: Color) -> u64 {
        self.clocks_ms[color.index()]
    }

    /// Move history as space-separated long algebraic moves, the key format
    /// of the opening book.
    pub fn history_key(&self) -> String {
        history_to_long_algebraic(&self.move_history)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.board)?;
        write!(f, "{:?} to move", self.side_to_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_caches_king_squares_and_clocks() {
        let position = Position::new_game();
        assert_eq!(position.king_square(Color::White), make_square(7, 4));
        assert_eq!(position.king_square(Color::Black), make_square(0, 4));
        assert_eq!(position.clock_ms(Color::White), DEFAULT_INITIAL_CLOCK_MS);
        assert_eq!(position.result, GameResult::None);
        assert_eq!(position.history_key(), "");
    }
}
