//! The canonical 8×8 board grid.
//!
//! Both the interactive `Position` and the search-side `SearchPosition` wrap a
//! `Board`, so all legality primitives in `move_generation` operate on this one
//! representation.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::*;
use crate::utils::render_game_state::render_board;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    pub fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard initial setup with every piece unmoved.
    pub fn starting() -> Self {
        let mut board = Self::empty();
        for (col, kind) in BACK_RANK.iter().copied().enumerate() {
            let col = col as u8;
            board.set(
                make_square(Color::Black.back_row(), col),
                Some(Piece::new(kind, Color::Black)),
            );
            board.set(
                make_square(Color::Black.pawn_start_row(), col),
                Some(Piece::new(PieceKind::Pawn, Color::Black)),
            );
            board.set(
                make_square(Color::White.pawn_start_row(), col),
                Some(Piece::new(PieceKind::Pawn, Color::White)),
            );
            board.set(
                make_square(Color::White.back_row(), col),
                Some(Piece::new(kind, Color::White)),
            );
        }
        board
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.cells[square_row(square) as usize][square_col(square) as usize]
    }

    #[inline]
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square_row(square) as usize][square_col(square) as usize] = piece;
    }

    #[inline]
    pub fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells[square_row(square) as usize][square_col(square) as usize].take()
    }

    #[inline]
    pub fn is_empty(&self, square: Square) -> bool {
        self.get(square).is_none()
    }

    #[inline]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.get(square).map(|p| p.color)
    }

    /// Iterate over every occupied square and its piece.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.cells
            .iter()
            .flatten()
            .enumerate()
            .filter_map(|(sq, cell)| cell.map(|piece| (sq as Square, piece)))
    }

    /// Locate the king of `color` by scanning the grid.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .map(|(sq, _)| sq)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render_board(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_board_has_kings_on_e_file() {
        let board = Board::starting();
        assert_eq!(board.king_square(Color::White), Some(make_square(7, 4)));
        assert_eq!(board.king_square(Color::Black), Some(make_square(0, 4)));
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn row_zero_is_black_back_rank() {
        let board = Board::starting();
        let a8 = board.get(make_square(0, 0)).expect("a8 occupied");
        assert_eq!(a8.kind, PieceKind::Rook);
        assert_eq!(a8.color, Color::Black);
        let e2 = board.get(make_square(6, 4)).expect("e2 occupied");
        assert_eq!(e2.kind, PieceKind::Pawn);
        assert_eq!(e2.color, Color::White);
    }
}
