//! Rook, bishop and queen moves along clear rays.

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::{DIAGONAL_RAYS, ORTHOGONAL_RAYS};

pub fn generate_sliding_moves(board: &Board, from: Square, piece: Piece, out: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::Rook => slide(board, from, piece.color, &ORTHOGONAL_RAYS, out),
        PieceKind::Bishop => slide(board, from, piece.color, &DIAGONAL_RAYS, out),
        PieceKind::Queen => {
            slide(board, from, piece.color, &ORTHOGONAL_RAYS, out);
            slide(board, from, piece.color, &DIAGONAL_RAYS, out);
        }
        _ => {}
    }
}

fn slide(board: &Board, from: Square, color: Color, rays: &[(i8, i8)], out: &mut Vec<Move>) {
    for &(dr, dc) in rays {
        let mut current = from;
        while let Some(to) = offset_square(current, dr, dc) {
            match board.color_at(to) {
                None => out.push(Move::new(from, to)),
                Some(c) if c != color => {
                    out.push(Move::new(from, to));
                    break;
                }
                Some(_) => break,
            }
            current = to;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn queen_in_open_center_reaches_27_squares() {
        let mut board = Board::empty();
        let queen = Piece::new(PieceKind::Queen, Color::White);
        board.set(sq("d4"), Some(queen));
        let mut out = Vec::new();
        generate_sliding_moves(&board, sq("d4"), queen, &mut out);
        assert_eq!(out.len(), 27);
    }

    #[test]
    fn rook_stops_on_capture_and_before_friend() {
        let mut board = Board::empty();
        let rook = Piece::new(PieceKind::Rook, Color::White);
        board.set(sq("a1"), Some(rook));
        board.set(sq("a3"), Some(Piece::new(PieceKind::Pawn, Color::Black)));
        board.set(sq("c1"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        let mut out = Vec::new();
        generate_sliding_moves(&board, sq("a1"), rook, &mut out);
        let mut targets: Vec<Square> = out.iter().map(|m| m.to).collect();
        targets.sort_unstable();
        let mut expected = vec![sq("a2"), sq("a3"), sq("b1")];
        expected.sort_unstable();
        assert_eq!(targets, expected);
    }
}
