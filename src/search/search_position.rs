//! Mutable search-side position with incremental make/unmake.
//!
//! `SearchPosition` owns a single board buffer plus everything the search
//! needs to read in O(1): the running White-relative score, the Zobrist key,
//! per-side lists of occupied squares and the king squares. Every mutation
//! goes through `lift`/`place` so the score and key never drift from the
//! board, and `unmake_move` replays the same primitives in reverse.
//!
//! The piece lists use swap-remove on capture; the undo record keeps the slot
//! the victim occupied so unmake restores the exact list order.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_move_generator::pseudo_legal_moves_from;
use crate::search::board_scoring::{evaluate_board, piece_contribution};
use crate::search::zobrist::{
    castling_key, castling_mask, compute_zobrist_key, piece_square_key, side_to_move_key,
};
use crate::utils::algebraic::square_to_algebraic;

const NO_SLOT: u8 = u8::MAX;

/// Everything `unmake_move` needs to restore the prior position exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UndoState {
    /// The executed move, with `captured` filled in.
    pub mv: Move,
    /// The moving piece as it stood before the move (kind and `has_moved`).
    moved: Piece,
    /// The castling rook as it stood before the move.
    rook: Option<Piece>,
    /// Index of the captured piece in its side's square list.
    captured_slot: u8,
    castling: u8,
}

#[derive(Debug, Clone)]
pub struct SearchPosition {
    board: Board,
    side_to_move: Color,
    /// Material + piece-square total, White minus Black.
    score: i32,
    hash: u64,
    castling: u8,
    king_squares: [Square; 2],
    piece_lists: [Vec<Square>; 2],
    /// Index of each occupied square within its owner's list.
    slots: [u8; 64],
}

impl SearchPosition {
    pub fn new(board: Board, side_to_move: Color) -> Self {
        let mut piece_lists = [Vec::with_capacity(16), Vec::with_capacity(16)];
        let mut slots = [NO_SLOT; 64];
        for (square, piece) in board.pieces() {
            let list = &mut piece_lists[piece.color.index()];
            slots[square as usize] = list.len() as u8;
            list.push(square);
        }

        Self {
            board,
            side_to_move,
            score: evaluate_board(&board),
            hash: compute_zobrist_key(&board, side_to_move),
            castling: castling_mask(&board),
            king_squares: [
                board.king_square(Color::White).unwrap_or_default(),
                board.king_square(Color::Black).unwrap_or_default(),
            ],
            piece_lists,
            slots,
        }
    }

    #[inline]
    pub fn from_position(position: &Position) -> Self {
        Self::new(position.board, position.side_to_move)
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Running White-relative material + positional score.
    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    #[inline]
    pub fn occupied_squares(&self, color: Color) -> &[Square] {
        &self.piece_lists[color.index()]
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        let side = self.side_to_move;
        is_square_attacked(&self.board, self.king_square(side), side.opposite())
    }

    // --- Incremental primitives ---

    #[inline]
    fn place(&mut self, square: Square, piece: Piece) {
        self.board.set(square, Some(piece));
        self.score += piece_contribution(piece, square);
        self.hash ^= piece_square_key(piece.color, piece.kind, square);
    }

    #[inline]
    fn lift(&mut self, square: Square) -> Option<Piece> {
        let piece = self.board.take(square)?;
        self.score -= piece_contribution(piece, square);
        self.hash ^= piece_square_key(piece.color, piece.kind, square);
        Some(piece)
    }

    #[inline]
    fn relocate_in_list(&mut self, color: Color, from: Square, to: Square) {
        let slot = self.slots[from as usize];
        self.piece_lists[color.index()][slot as usize] = to;
        self.slots[from as usize] = NO_SLOT;
        self.slots[to as usize] = slot;
    }

    fn remove_from_list(&mut self, color: Color, square: Square) -> u8 {
        let slot = self.slots[square as usize];
        let list = &mut self.piece_lists[color.index()];
        list.swap_remove(slot as usize);
        if let Some(&moved) = list.get(slot as usize) {
            self.slots[moved as usize] = slot;
        }
        self.slots[square as usize] = NO_SLOT;
        slot
    }

    /// Exact inverse of `remove_from_list`.
    fn restore_in_list(&mut self, color: Color, square: Square, slot: u8) {
        let list = &mut self.piece_lists[color.index()];
        if slot as usize == list.len() {
            list.push(square);
        } else {
            let displaced = list[slot as usize];
            list.push(displaced);
            self.slots[displaced as usize] = (list.len() - 1) as u8;
            list[slot as usize] = square;
        }
        self.slots[square as usize] = slot;
    }

    fn update_castling(&mut self) {
        let mask = castling_mask(&self.board);
        self.hash ^= castling_key(self.castling) ^ castling_key(mask);
        self.castling = mask;
    }

    // --- Make / unmake ---

    /// Execute `mv` in place for the side to move.
    ///
    /// The move is trusted to be legal; only an empty origin square is
    /// rejected.
    pub fn make_move(&mut self, mv: Move) -> ChessResult<UndoState> {
        let mover = self.side_to_move;
        let castling = self.castling;
        let Some(piece) = self.lift(mv.from) else {
            return Err(ChessError::EmptySquare(
                square_to_algebraic(mv.from).unwrap_or_default(),
            ));
        };

        let mut executed = mv;
        let mut rook = None;
        let mut captured_slot = NO_SLOT;

        if mv.is_castle {
            let (king_to, rook_to) = castle_destinations(mv.from, mv.to);
            let Some(castle_rook) = self.lift(mv.to) else {
                self.place(mv.from, piece);
                return Err(ChessError::EmptySquare(
                    square_to_algebraic(mv.to).unwrap_or_default(),
                ));
            };
            self.place(king_to, piece.moved());
            self.place(rook_to, castle_rook.moved());
            self.relocate_in_list(mover, mv.from, king_to);
            self.relocate_in_list(mover, mv.to, rook_to);
            self.king_squares[mover.index()] = king_to;
            rook = Some(castle_rook);
            executed.captured = None;
        } else {
            executed.captured = self.lift(mv.to);
            if let Some(victim) = executed.captured {
                captured_slot = self.remove_from_list(victim.color, mv.to);
            }
            let placed = match mv.promotion {
                Some(kind) => Piece { kind, ..piece },
                None => piece,
            };
            self.place(mv.to, placed.moved());
            self.relocate_in_list(mover, mv.from, mv.to);
            if piece.kind == PieceKind::King {
                self.king_squares[mover.index()] = mv.to;
            }
        }

        self.side_to_move = mover.opposite();
        self.hash ^= side_to_move_key();
        self.update_castling();

        Ok(UndoState {
            mv: executed,
            moved: piece,
            rook,
            captured_slot,
            castling,
        })
    }

    /// Reverse a move previously returned by [`make_move`](Self::make_move).
    ///
    /// Undo records must be replayed in LIFO order.
    pub fn unmake_move(&mut self, undo: UndoState) {
        let mv = undo.mv;
        let mover = self.side_to_move.opposite();
        self.side_to_move = mover;
        self.hash ^= side_to_move_key();
        self.hash ^= castling_key(self.castling) ^ castling_key(undo.castling);
        self.castling = undo.castling;

        if mv.is_castle {
            let (king_to, rook_to) = castle_destinations(mv.from, mv.to);
            self.lift(king_to);
            self.lift(rook_to);
            self.place(mv.from, undo.moved);
            if let Some(rook) = undo.rook {
                self.place(mv.to, rook);
            }
            self.relocate_in_list(mover, king_to, mv.from);
            self.relocate_in_list(mover, rook_to, mv.to);
            self.king_squares[mover.index()] = mv.from;
            return;
        }

        self.lift(mv.to);
        self.place(mv.from, undo.moved);
        self.relocate_in_list(mover, mv.to, mv.from);
        if let Some(victim) = mv.captured {
            self.place(mv.to, victim);
            self.restore_in_list(victim.color, mv.to, undo.captured_slot);
        }
        if undo.moved.kind == PieceKind::King {
            self.king_squares[mover.index()] = mv.from;
        }
    }

    // --- Move generation ---

    /// Pseudo-legal moves for the side to move, from the square lists.
    fn pseudo_legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::with_capacity(48);
        for &square in self.occupied_squares(self.side_to_move) {
            pseudo_legal_moves_from(&self.board, square, &mut moves);
        }
        moves
    }

    /// True when `mv` does not leave the mover's king attacked.
    fn is_king_safe_after(&mut self, mv: Move) -> ChessResult<bool> {
        let mover = self.side_to_move;
        let undo = self.make_move(mv)?;
        let safe = !is_square_attacked(&self.board, self.king_square(mover), mover.opposite());
        self.unmake_move(undo);
        Ok(safe)
    }

    /// Every legal move for the side to move.
    pub fn legal_moves(&mut self) -> ChessResult<Vec<Move>> {
        let mut legal = Vec::with_capacity(48);
        for mv in self.pseudo_legal_moves() {
            if self.is_king_safe_after(mv)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    /// Legal captures and promotions, the quiescence move set.
    pub fn legal_tactical_moves(&mut self) -> ChessResult<Vec<Move>> {
        let mut legal = Vec::with_capacity(16);
        for mv in self.pseudo_legal_moves() {
            if self.is_tactical(&mv) && self.is_king_safe_after(mv)? {
                legal.push(mv);
            }
        }
        Ok(legal)
    }

    #[inline]
    pub fn is_capture(&self, mv: &Move) -> bool {
        !mv.is_castle && !self.board.is_empty(mv.to)
    }

    #[inline]
    pub fn is_tactical(&self, mv: &Move) -> bool {
        self.is_capture(mv) || mv.promotion.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;

    fn search_position(fen: &str) -> SearchPosition {
        SearchPosition::from_position(&parse_fen(fen).expect("FEN should parse"))
    }

    fn sorted_lists(position: &SearchPosition) -> [Vec<Square>; 2] {
        let mut lists = position.piece_lists.clone();
        lists.iter_mut().for_each(|l| l.sort_unstable());
        lists
    }

    /// Incremental fields agree with a from-scratch rebuild.
    fn assert_consistent(position: &SearchPosition) {
        let rebuilt = SearchPosition::new(position.board, position.side_to_move);
        assert_eq!(position.score, rebuilt.score);
        assert_eq!(position.hash, rebuilt.hash);
        assert_eq!(position.castling, rebuilt.castling);
        assert_eq!(position.king_squares, rebuilt.king_squares);
        assert_eq!(sorted_lists(position), sorted_lists(&rebuilt));
        for color in [Color::White, Color::Black] {
            for (i, &sq) in position.occupied_squares(color).iter().enumerate() {
                assert_eq!(position.slots[sq as usize] as usize, i);
            }
        }
    }

    /// Apply then undo every legal move and demand bit-identical state.
    fn assert_round_trips(fen: &str) {
        let mut position = search_position(fen);
        let moves = position.legal_moves().expect("movegen should succeed");
        assert!(!moves.is_empty());
        for mv in moves {
            let before = position.clone();
            let undo = position.make_move(mv).expect("legal move should apply");
            assert_consistent(&position);
            position.unmake_move(undo);
            assert_eq!(position.board, before.board, "board differs after {mv:?}");
            assert_eq!(position.score, before.score, "score differs after {mv:?}");
            assert_eq!(position.hash, before.hash, "hash differs after {mv:?}");
            assert_eq!(position.piece_lists, before.piece_lists);
            assert_eq!(position.side_to_move, before.side_to_move);
            assert_eq!(position.king_squares, before.king_squares);
        }
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let mut position = SearchPosition::from_position(&Position::new_game());
        assert_eq!(position.legal_moves().expect("movegen").len(), 20);
        assert!(!position.in_check());
    }

    #[test]
    fn make_unmake_round_trips_from_start() {
        assert_round_trips(crate::game_state::chess_rules::STARTING_POSITION_FEN);
    }

    #[test]
    fn make_unmake_round_trips_castles_captures_and_promotions() {
        assert_round_trips("r3k2r/pPppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        assert_round_trips("r3k2r/pPppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R b KQkq - 0 1");
        assert_round_trips("n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1");
    }

    #[test]
    fn unmake_restores_moved_flags() {
        let mut position = search_position("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let e1 = make_square(7, 4);
        let undo = position
            .make_move(Move::castle(e1, make_square(7, 7)))
            .expect("castle should apply");
        assert_eq!(position.king_square(Color::White), make_square(7, 6));
        position.unmake_move(undo);
        let king = position.board().get(e1).expect("king back on e1");
        assert!(!king.has_moved);
        assert_eq!(
            position
                .legal_moves()
                .expect("movegen")
                .iter()
                .filter(|m| m.is_castle)
                .count(),
            2
        );
    }

    #[test]
    fn capture_is_recorded_on_undo_state() {
        let mut position = search_position("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let mv = Move::new(make_square(4, 4), make_square(3, 3));
        let undo = position.make_move(mv).expect("capture should apply");
        assert_eq!(undo.mv.captured.map(|p| p.kind), Some(PieceKind::Pawn));
        assert_eq!(position.occupied_squares(Color::Black).len(), 1);
        position.unmake_move(undo);
        assert_eq!(position.occupied_squares(Color::Black).len(), 2);
    }

    #[test]
    fn empty_origin_is_rejected() {
        let mut position = SearchPosition::from_position(&Position::new_game());
        let err = position
            .make_move(Move::new(make_square(4, 4), make_square(3, 4)))
            .expect_err("empty square should fail");
        assert!(matches!(err, ChessError::EmptySquare(_)));
    }

    #[test]
    fn tactical_moves_are_captures_or_promotions() {
        let mut position = search_position("4k3/1P6/8/3p4/4P3/8/8/4K3 w - - 0 1");
        let tactical = position.legal_tactical_moves().expect("movegen");
        // exd5 plus four promotions on b8.
        assert_eq!(tactical.len(), 5);
        assert!(tactical.iter().all(|m| position.is_tactical(m)));
    }
}
