//! Legal move validation and generation.
//!
//! Orchestrates piece-wise pseudo-legal generation, then filters out moves
//! that leave the mover's own king attacked by simulating them on a copy of
//! the board.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::board_after_move;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_sliding::generate_sliding_moves;

/// Append every pseudo-legal move of the piece on `from` to `out`.
pub fn pseudo_legal_moves_from(board: &Board, from: Square, out: &mut Vec<Move>) {
    let Some(piece) = board.get(from) else {
        return;
    };
    match piece.kind {
        PieceKind::Pawn => generate_pawn_moves(board, from, piece, out),
        PieceKind::Knight => generate_knight_moves(board, from, piece, out),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            generate_sliding_moves(board, from, piece, out)
        }
        PieceKind::King => generate_king_moves(board, from, piece, out),
    }
}

/// True when playing `mv` does not leave the king of `color` attacked.
pub fn leaves_king_safe(board: &Board, mv: &Move, color: Color) -> bool {
    let next = board_after_move(board, mv);
    match next.king_square(color) {
        Some(king_sq) => !is_square_attacked(&next, king_sq, color.opposite()),
        None => false,
    }
}

/// All legal moves of the piece on `from`, for whichever color owns it.
pub fn legal_moves_from(board: &Board, from: Square) -> Vec<Move> {
    let Some(piece) = board.get(from) else {
        return Vec::new();
    };
    let mut pseudo = Vec::with_capacity(32);
    pseudo_legal_moves_from(board, from, &mut pseudo);
    pseudo.retain(|mv| leaves_king_safe(board, mv, piece.color));
    pseudo
}

/// Board-level verdict: may the piece on `from` legally move to `to`?
///
/// The mover's color is taken from the piece itself; turn order is the
/// caller's concern.
pub fn is_legal_move(board: &Board, from: Square, to: Square) -> bool {
    legal_moves_from(board, from).iter().any(|mv| mv.to == to)
}

/// Legal destination squares for the piece on `from` in `position`.
///
/// Empty when the square is empty or holds a piece of the side not to move.
/// Promotions collapse to a single destination.
pub fn legal_moves(position: &Position, from: Square) -> Vec<Square> {
    if position.board.color_at(from) != Some(position.side_to_move) {
        return Vec::new();
    }
    let mut destinations: Vec<Square> = legal_moves_from(&position.board, from)
        .into_iter()
        .map(|mv| mv.to)
        .collect();
    destinations.sort_unstable();
    destinations.dedup();
    destinations
}

/// Every legal move for `color`.
pub fn all_legal_moves(board: &Board, color: Color) -> Vec<Move> {
    let mut legal = Vec::with_capacity(64);
    for (from, piece) in board.pieces() {
        if piece.color == color {
            legal.extend(legal_moves_from(board, from));
        }
    }
    legal
}

pub fn has_any_legal_move(board: &Board, color: Color) -> bool {
    board
        .pieces()
        .filter(|(_, piece)| piece.color == color)
        .any(|(from, _)| !legal_moves_from(board, from).is_empty())
}
