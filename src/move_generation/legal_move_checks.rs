//! Attack and check detection on the board grid.
//!
//! Works backwards from the target square: a square is attacked when a
//! matching enemy piece sits on one of the pawn, knight, king or sliding-ray
//! squares that reach it.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{
    DIAGONAL_RAYS, KING_STEPS, KNIGHT_JUMPS, ORTHOGONAL_RAYS,
};

#[inline]
fn holds(board: &Board, square: Option<Square>, color: Color, kind: PieceKind) -> bool {
    square
        .and_then(|sq| board.get(sq))
        .is_some_and(|p| p.color == color && p.kind == kind)
}

pub fn is_square_attacked(board: &Board, square: Square, attacker: Color) -> bool {
    // A pawn attacks diagonally forward, so look one row "behind" the target
    // from the attacker's point of view.
    let back = -attacker.pawn_direction();
    for d_col in [-1i8, 1] {
        if holds(board, offset_square(square, back, d_col), attacker, PieceKind::Pawn) {
            return true;
        }
    }

    if KNIGHT_JUMPS
        .iter()
        .any(|&(dr, dc)| holds(board, offset_square(square, dr, dc), attacker, PieceKind::Knight))
    {
        return true;
    }

    if KING_STEPS
        .iter()
        .any(|&(dr, dc)| holds(board, offset_square(square, dr, dc), attacker, PieceKind::King))
    {
        return true;
    }

    ray_hits(board, square, attacker, &ORTHOGONAL_RAYS, PieceKind::Rook)
        || ray_hits(board, square, attacker, &DIAGONAL_RAYS, PieceKind::Bishop)
}

/// Walk each ray until the first occupied square and report whether it holds
/// an enemy `slider` or queen.
fn ray_hits(
    board: &Board,
    square: Square,
    attacker: Color,
    rays: &[(i8, i8)],
    slider: PieceKind,
) -> bool {
    for &(dr, dc) in rays {
        let mut current = square;
        while let Some(next) = offset_square(current, dr, dc) {
            if let Some(piece) = board.get(next) {
                if piece.color == attacker
                    && (piece.kind == slider || piece.kind == PieceKind::Queen)
                {
                    return true;
                }
                break;
            }
            current = next;
        }
    }
    false
}

#[inline]
pub fn is_king_in_check(board: &Board, color: Color) -> bool {
    let Some(king_sq) = board.king_square(color) else {
        return false;
    };
    is_square_attacked(board, king_sq, color.opposite())
}
