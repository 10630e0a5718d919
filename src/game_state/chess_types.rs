//! Core value types shared by the rules layer and the search layer.
//!
//! Squares are plain indices into the 8×8 grid: `row * 8 + col`, where row 0
//! is rank 8 (Black's back rank) and row 7 is rank 1. Column 0 is the a-file.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use crate::game_state::board::Board;
pub use crate::game_state::position::Position;

/// Board square index (`0..=63`).
pub type Square = u8;

pub const BOARD_SIZE: i8 = 8;

#[inline]
pub const fn make_square(row: u8, col: u8) -> Square {
    row * 8 + col
}

#[inline]
pub const fn square_row(square: Square) -> u8 {
    square / 8
}

#[inline]
pub const fn square_col(square: Square) -> u8 {
    square % 8
}

/// Step from `square` by `(d_row, d_col)`, returning `None` when the step
/// leaves the board.
#[inline]
pub fn offset_square(square: Square, d_row: i8, d_col: i8) -> Option<Square> {
    let row = square_row(square) as i8 + d_row;
    let col = square_col(square) as i8 + d_col;
    if (0..BOARD_SIZE).contains(&row) && (0..BOARD_SIZE).contains(&col) {
        Some(make_square(row as u8, col as u8))
    } else {
        None
    }
}

/// Side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward pawn step. White advances towards row 0.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn pawn_start_row(self) -> u8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn promotion_row(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    #[inline]
    pub const fn back_row(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Piece kinds a pawn may promote to, strongest first.
    pub const PROMOTIONS: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    #[inline]
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub has_moved: bool,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Self {
            kind,
            color,
            has_moved: false,
        }
    }

    #[inline]
    pub const fn moved(self) -> Self {
        Self {
            has_moved: true,
            ..self
        }
    }
}

/// A move between two squares.
///
/// Castling is encoded as the king moving onto its own rook's square with
/// `is_castle` set; executors decode the real king and rook destinations via
/// [`castle_destinations`]. `captured` is only filled in on executed moves
/// (see `UndoState`), never on generated ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub is_castle: bool,
    pub promotion: Option<PieceKind>,
    pub captured: Option<Piece>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            is_castle: false,
            promotion: None,
            captured: None,
        }
    }

    #[inline]
    pub const fn castle(king_from: Square, rook_from: Square) -> Self {
        Self {
            is_castle: true,
            ..Self::new(king_from, rook_from)
        }
    }

    #[inline]
    pub const fn promoting(from: Square, to: Square, kind: PieceKind) -> Self {
        Self {
            promotion: Some(kind),
            ..Self::new(from, to)
        }
    }

    /// Same from/to/castle/promotion, ignoring any execution-time capture.
    #[inline]
    pub fn same_as(&self, other: &Move) -> bool {
        self.from == other.from
            && self.to == other.to
            && self.is_castle == other.is_castle
            && self.promotion == other.promotion
    }
}

/// Decode a king-onto-rook castle into `(king_to, rook_to)`.
///
/// Kingside castles land the king on the g-file and the rook on the f-file;
/// queenside castles use the c- and d-files.
#[inline]
pub fn castle_destinations(king_from: Square, rook_from: Square) -> (Square, Square) {
    let row = square_row(king_from);
    if square_col(rook_from) > square_col(king_from) {
        (make_square(row, 6), make_square(row, 5))
    } else {
        (make_square(row, 2), make_square(row, 3))
    }
}

/// Terminal state of a game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GameResult {
    #[default]
    None,
    White,
    Black,
    Draw,
}

impl GameResult {
    #[inline]
    pub const fn win_for(color: Color) -> Self {
        match color {
            Color::White => GameResult::White,
            Color::Black => GameResult::Black,
        }
    }

    #[inline]
    pub const fn is_over(self) -> bool {
        !matches!(self, GameResult::None)
    }
}
