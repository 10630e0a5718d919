//! King steps plus castling, encoded as the king moving onto its own rook.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_shared::KING_STEPS;

pub fn generate_king_moves(board: &Board, from: Square, king: Piece, out: &mut Vec<Move>) {
    for (dr, dc) in KING_STEPS {
        let Some(to) = offset_square(from, dr, dc) else {
            continue;
        };
        if board.color_at(to) != Some(king.color) {
            out.push(Move::new(from, to));
        }
    }

    generate_castling_moves(board, from, king, out);
}

fn generate_castling_moves(board: &Board, from: Square, king: Piece, out: &mut Vec<Move>) {
    if king.has_moved {
        return;
    }
    let enemy = king.color.opposite();
    let row = square_row(from);
    let king_col = square_col(from);

    for rook_col in [7u8, 0u8] {
        let rook_sq = make_square(row, rook_col);
        let rook_ok = board.get(rook_sq).is_some_and(|p| {
            p.kind == PieceKind::Rook && p.color == king.color && !p.has_moved
        });
        if !rook_ok {
            continue;
        }

        let (lo, hi) = (king_col.min(rook_col), king_col.max(rook_col));
        if (lo + 1..hi).any(|col| !board.is_empty(make_square(row, col))) {
            continue;
        }

        // Start, transit and destination squares must all be safe.
        let (king_to, _) = castle_destinations(from, rook_sq);
        let dest_col = square_col(king_to);
        let (t_lo, t_hi) = (king_col.min(dest_col), king_col.max(dest_col));
        if (t_lo..=t_hi).any(|col| is_square_attacked(board, make_square(row, col), enemy)) {
            continue;
        }

        out.push(Move::castle(from, rook_sq));
    }
}
