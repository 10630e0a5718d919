//! Copy-on-write style move application for the board grid.
//!
//! Used by legality filtering (simulate, then ask whether the king is
//! attacked) and by the interactive rules state machine. The search layer has
//! its own incremental executor in `search::search_position`.

use crate::game_state::chess_types::*;

/// Apply `mv` to `board` in place and return the captured piece, if any.
///
/// Castling moves relocate both king and rook to their decoded destinations.
/// A promotion replaces the pawn with the requested piece kind. Every piece
/// that moves is marked as moved. An empty origin square leaves the board
/// untouched.
pub fn apply_move_to_board(board: &mut Board, mv: &Move) -> Option<Piece> {
    if mv.is_castle {
        let (king_to, rook_to) = castle_destinations(mv.from, mv.to);
        let king = board.take(mv.from);
        let rook = board.take(mv.to);
        board.set(king_to, king.map(Piece::moved));
        board.set(rook_to, rook.map(Piece::moved));
        return None;
    }

    let piece = board.take(mv.from)?;
    let captured = board.take(mv.to);
    let placed = match mv.promotion {
        Some(kind) => Piece { kind, ..piece },
        None => piece,
    };
    board.set(mv.to, Some(placed.moved()));
    captured
}

/// Return a copy of `board` with `mv` applied.
#[inline]
pub fn board_after_move(board: &Board, mv: &Move) -> Board {
    let mut next = *board;
    apply_move_to_board(&mut next, mv);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    #[test]
    fn castle_relocates_king_and_rook() {
        let mut board = Board::empty();
        board.set(sq("e1"), Some(Piece::new(PieceKind::King, Color::White)));
        board.set(sq("h1"), Some(Piece::new(PieceKind::Rook, Color::White)));
        let captured = apply_move_to_board(&mut board, &Move::castle(sq("e1"), sq("h1")));
        assert_eq!(captured, None);
        assert!(board.is_empty(sq("e1")));
        assert!(board.is_empty(sq("h1")));
        let king = board.get(sq("g1")).expect("king on g1");
        let rook = board.get(sq("f1")).expect("rook on f1");
        assert_eq!(king.kind, PieceKind::King);
        assert!(king.has_moved && rook.has_moved);
    }

    #[test]
    fn promotion_capture_returns_victim() {
        let mut board = Board::empty();
        board.set(sq("g7"), Some(Piece::new(PieceKind::Pawn, Color::White)));
        board.set(sq("h8"), Some(Piece::new(PieceKind::Rook, Color::Black)));
        let captured = apply_move_to_board(
            &mut board,
            &Move::promoting(sq("g7"), sq("h8"), PieceKind::Knight),
        );
        assert_eq!(captured.map(|p| p.kind), Some(PieceKind::Rook));
        let placed = board.get(sq("h8")).expect("promoted piece");
        assert_eq!(placed.kind, PieceKind::Knight);
        assert_eq!(placed.color, Color::White);
    }
}
