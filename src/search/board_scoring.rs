//! Static evaluation: material plus piece-square tables.
//!
//! Every piece on a square contributes `piece_value + table bonus`, signed
//! positive for White and negative for Black. Because the contribution of one
//! piece never depends on any other piece, `SearchPosition` maintains the
//! total incrementally and scorers only read it back.
//!
//! Tables are written from White's point of view with rank 8 on the first
//! line, which matches the grid layout (row 0 = rank 8). Black looks them up
//! with the rows mirrored.

use crate::game_state::chess_types::*;
use crate::search::search_position::SearchPosition;

pub const MATE_SCORE: i32 = 30000;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, position: &SearchPosition) -> i32;
}

/// Material + piece-square evaluation read from the running score.
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareScorer;

impl BoardScorer for PieceSquareScorer {
    #[inline]
    fn score(&self, position: &SearchPosition) -> i32 {
        match position.side_to_move() {
            Color::White => position.score(),
            Color::Black => -position.score(),
        }
    }
}

#[inline]
pub const fn piece_value(piece: PieceKind) -> i32 {
    match piece {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20000,
    }
}

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
    50, 50, 50, 50, 50, 50, 50, 50,
    10, 10, 20, 30, 30, 20, 10, 10,
     5,  5, 10, 25, 25, 10,  5,  5,
     0,  0,  0, 20, 20,  0,  0,  0,
     5, -5,-10,  0,  0,-10, -5,  5,
     5, 10, 10,-20,-20, 10, 10,  5,
     0,  0,  0,  0,  0,  0,  0,  0,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[inline]
fn table_for(piece: PieceKind) -> &'static [i32; 64] {
    match piece {
        PieceKind::Pawn => &PAWN_TABLE,
        PieceKind::Knight => &KNIGHT_TABLE,
        PieceKind::Bishop => &BISHOP_TABLE,
        PieceKind::Rook => &ROOK_TABLE,
        PieceKind::Queen => &QUEEN_TABLE,
        PieceKind::King => &KING_TABLE,
    }
}

/// Positional bonus for `piece` of `color` standing on `square`.
#[inline]
pub fn piece_square_bonus(piece: PieceKind, color: Color, square: Square) -> i32 {
    let index = match color {
        Color::White => square,
        Color::Black => make_square(7 - square_row(square), square_col(square)),
    };
    table_for(piece)[index as usize]
}

/// Signed contribution of one piece to the White-relative score.
#[inline]
pub fn piece_contribution(piece: Piece, square: Square) -> i32 {
    let value = piece_value(piece.kind) + piece_square_bonus(piece.kind, piece.color, square);
    match piece.color {
        Color::White => value,
        Color::Black => -value,
    }
}

/// Full White-relative evaluation of a board, recomputed from scratch.
pub fn evaluate_board(board: &Board) -> i32 {
    board
        .pieces()
        .map(|(square, piece)| piece_contribution(piece, square))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn starting_position_is_balanced() {
        assert_eq!(evaluate_board(&Board::starting()), 0);
    }

    #[test]
    fn black_tables_mirror_white() {
        let e2 = algebraic_to_square("e2").expect("e2");
        let e7 = algebraic_to_square("e7").expect("e7");
        assert_eq!(
            piece_square_bonus(PieceKind::Pawn, Color::White, e2),
            piece_square_bonus(PieceKind::Pawn, Color::Black, e7)
        );
        assert_eq!(piece_square_bonus(PieceKind::Pawn, Color::White, e2), -20);
    }

    #[test]
    fn central_knight_beats_rim_knight() {
        let center = parse_fen("4k3/8/8/8/3N4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rim = parse_fen("4k3/8/8/8/N7/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(evaluate_board(&center.board) > evaluate_board(&rim.board));
    }

    #[test]
    fn scorer_reflects_side_to_move_perspective() {
        let white = parse_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let black = parse_fen("4k3/8/8/8/8/8/8/3QK3 b - - 0 1").expect("FEN should parse");
        let white_score = PieceSquareScorer.score(&SearchPosition::from_position(&white));
        let black_score = PieceSquareScorer.score(&SearchPosition::from_position(&black));
        assert!(white_score > 800);
        assert_eq!(white_score, -black_score);
    }
}
