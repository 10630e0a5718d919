//! Pseudo-legal pawn moves: single and double pushes, diagonal captures and
//! promotions. En passant is not part of this rule set.

use crate::game_state::chess_types::*;

pub fn generate_pawn_moves(board: &Board, from: Square, pawn: Piece, out: &mut Vec<Move>) {
    let dir = pawn.color.pawn_direction();

    if let Some(one) = offset_square(from, dir, 0) {
        if board.is_empty(one) {
            push_pawn_move(from, one, pawn.color, out);

            if square_row(from) == pawn.color.pawn_start_row() {
                if let Some(two) = offset_square(from, 2 * dir, 0) {
                    if board.is_empty(two) {
                        out.push(Move::new(from, two));
                    }
                }
            }
        }
    }

    for d_col in [-1i8, 1] {
        let Some(to) = offset_square(from, dir, d_col) else {
            continue;
        };
        if board.color_at(to) == Some(pawn.color.opposite()) {
            push_pawn_move(from, to, pawn.color, out);
        }
    }
}

fn push_pawn_move(from: Square, to: Square, color: Color, out: &mut Vec<Move>) {
    if square_row(to) == color.promotion_row() {
        for kind in PieceKind::PROMOTIONS {
            out.push(Move::promoting(from, to, kind));
        }
    } else {
        out.push(Move::new(from, to));
    }
}
