//! Rules state machine for interactive play.
//!
//! A pure transition function over `Position`: every input produces a new
//! position, and any input that is not legal right now (wrong turn, blocked
//! path, moving into check, acting after the game ended) produces an
//! unchanged copy. No transition ever fails with an error.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_apply::apply_move_to_board;
use crate::move_generation::legal_move_checks::is_king_in_check;
use crate::move_generation::legal_move_generator::{
    has_any_legal_move, legal_moves, legal_moves_from,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Transition {
    /// Click on a cell: select a piece, move the selected piece, or castle by
    /// picking one's own rook while the king is selected.
    SelectCell(Square),
    MakeMove { from: Square, to: Square },
    Castle { king: Square, rook: Square },
    /// Choose the piece for a pawn waiting on the last rank.
    Promote(PieceKind),
    /// Charge elapsed thinking time to the side to move.
    UpdateClock { elapsed_ms: u64 },
    /// The given side ran out of time.
    Timeout(Color),
    Reset,
}

pub fn transition(position: &Position, input: Transition) -> Position {
    match input {
        Transition::SelectCell(square) => select_cell(position, square),
        Transition::MakeMove { from, to } => make_move(position, from, to),
        Transition::Castle { king, rook } => castle(position, king, rook),
        Transition::Promote(kind) => promote(position, kind),
        Transition::UpdateClock { elapsed_ms } => update_clock(position, elapsed_ms),
        Transition::Timeout(color) => timeout(position, color),
        Transition::Reset => Position::new_game_with_clock(position.clock),
    }
}

#[inline]
fn accepts_input(position: &Position) -> bool {
    !position.result.is_over() && position.pending_promotion.is_none()
}

fn select_cell(position: &Position, square: Square) -> Position {
    if !accepts_input(position) {
        return position.clone();
    }

    if let Some(selected) = position.selected {
        if selected == square {
            let mut next = position.clone();
            clear_selection(&mut next);
            return next;
        }
        if position.legal_destinations.contains(&square) {
            return make_move(position, selected, square);
        }
    }

    if position.board.color_at(square) == Some(position.side_to_move) {
        let mut next = position.clone();
        next.selected = Some(square);
        next.legal_destinations = legal_moves(position, square);
        return next;
    }

    position.clone()
}

fn make_move(position: &Position, from: Square, to: Square) -> Position {
    if !accepts_input(position) || position.board.color_at(from) != Some(position.side_to_move) {
        return position.clone();
    }

    let Some(mut mv) = legal_moves_from(&position.board, from)
        .into_iter()
        .find(|mv| mv.to == to)
    else {
        return position.clone();
    };
    // The piece choice arrives later through `Transition::Promote`.
    mv.promotion = None;

    let mut next = position.clone();
    let mover = next.side_to_move;
    let moved_kind = next.board.get(from).map(|p| p.kind);

    mv.captured = apply_move_to_board(&mut next.board, &mv);
    if moved_kind == Some(PieceKind::King) {
        let king_to = if mv.is_castle {
            castle_destinations(mv.from, mv.to).0
        } else {
            mv.to
        };
        next.king_squares[mover.index()] = king_to;
    }
    next.move_history.push(mv);
    clear_selection(&mut next);

    if moved_kind == Some(PieceKind::Pawn) && square_row(to) == mover.promotion_row() {
        next.pending_promotion = Some(to);
        return next;
    }

    finish_turn(&mut next);
    next
}

fn castle(position: &Position, king: Square, rook: Square) -> Position {
    let is_castle = legal_moves_from(&position.board, king)
        .iter()
        .any(|mv| mv.is_castle && mv.to == rook);
    if !is_castle {
        return position.clone();
    }
    make_move(position, king, rook)
}

fn promote(position: &Position, kind: PieceKind) -> Position {
    let Some(square) = position.pending_promotion else {
        return position.clone();
    };
    if position.result.is_over() || !kind.is_promotion_target() {
        return position.clone();
    }
    let Some(pawn) = position.board.get(square) else {
        return position.clone();
    };

    let mut next = position.clone();
    next.board.set(square, Some(Piece { kind, ..pawn }));
    if let Some(last) = next.move_history.last_mut() {
        last.promotion = Some(kind);
    }
    next.pending_promotion = None;
    finish_turn(&mut next);
    next
}

fn update_clock(position: &Position, elapsed_ms: u64) -> Position {
    if position.result.is_over() {
        return position.clone();
    }
    let mut next = position.clone();
    let side = next.side_to_move;
    let remaining = next.clocks_ms[side.index()].saturating_sub(elapsed_ms);
    next.clocks_ms[side.index()] = remaining;
    if remaining == 0 {
        next.result = GameResult::win_for(side.opposite());
    }
    next
}

fn timeout(position: &Position, color: Color) -> Position {
    if position.result.is_over() {
        return position.clone();
    }
    let mut next = position.clone();
    next.clocks_ms[color.index()] = 0;
    next.result = GameResult::win_for(color.opposite());
    next
}

fn clear_selection(position: &mut Position) {
    position.selected = None;
    position.legal_destinations.clear();
}

/// Credit the increment, hand the turn over and detect mate or stalemate.
fn finish_turn(position: &mut Position) {
    let mover = position.side_to_move;
    let clock = position.clocks_ms[mover.index()];
    let cap = position.clock.max_bank_ms.max(clock);
    position.clocks_ms[mover.index()] = clock
        .saturating_add(position.clock.increment_ms)
        .min(cap);

    let side = mover.opposite();
    position.side_to_move = side;
    if !has_any_legal_move(&position.board, side) {
        position.result = if is_king_in_check(&position.board, side) {
            GameResult::win_for(mover)
        } else {
            GameResult::Draw
        };
    }
}

impl Position {
    #[inline]
    pub fn apply(&self, input: Transition) -> Position {
        transition(self, input)
    }

    #[inline]
    pub fn select_cell(&self, square: Square) -> Position {
        transition(self, Transition::SelectCell(square))
    }

    #[inline]
    pub fn make_move(&self, from: Square, to: Square) -> Position {
        transition(self, Transition::MakeMove { from, to })
    }

    #[inline]
    pub fn castle(&self, king: Square, rook: Square) -> Position {
        transition(self, Transition::Castle { king, rook })
    }

    #[inline]
    pub fn promote(&self, kind: PieceKind) -> Position {
        transition(self, Transition::Promote(kind))
    }

    #[inline]
    pub fn update_clock(&self, elapsed_ms: u64) -> Position {
        transition(self, Transition::UpdateClock { elapsed_ms })
    }

    #[inline]
    pub fn timeout(&self, color: Color) -> Position {
        transition(self, Transition::Timeout(color))
    }

    #[inline]
    pub fn reset(&self) -> Position {
        transition(self, Transition::Reset)
    }

    /// Play a move chosen by the search engine, including its promotion
    /// piece when it has one.
    pub fn apply_engine_move(&self, mv: &Move) -> Position {
        let next = self.make_move(mv.from, mv.to);
        match (mv.promotion, next.pending_promotion) {
            (Some(kind), Some(_)) => next.promote(kind),
            _ => next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::position::ClockSettings;
    use crate::utils::algebraic::algebraic_to_square;

    fn sq(name: &str) -> Square {
        algebraic_to_square(name).expect("valid square")
    }

    fn play(position: &Position, moves: &[(&str, &str)]) -> Position {
        moves
            .iter()
            .fold(position.clone(), |p, (from, to)| p.make_move(sq(from), sq(to)))
    }

    #[test]
    fn fools_mate_is_checkmate_for_black() {
        let position = play(
            &Position::new_game(),
            &[("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")],
        );
        assert_eq!(position.move_history.len(), 4);
        assert_eq!(position.result, GameResult::Black);
        assert_eq!(position.side_to_move, Color::White);

        let frozen = position.make_move(sq("a2"), sq("a3"));
        assert_eq!(frozen, position);
    }

    #[test]
    fn stalemate_is_a_draw() {
        let start = Position::from_fen("7k/5Q2/8/6K1/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let position = start.make_move(sq("g5"), sq("g6"));
        assert_eq!(position.result, GameResult::Draw);
    }

    #[test]
    fn illegal_inputs_leave_position_unchanged() {
        let start = Position::new_game();
        // Wrong turn.
        assert_eq!(start.make_move(sq("e7"), sq("e5")), start);
        // Blocked path.
        assert_eq!(start.make_move(sq("a1"), sq("a3")), start);
        // Not a piece move at all.
        assert_eq!(start.make_move(sq("e4"), sq("e5")), start);
        // Promotion without a pending pawn.
        assert_eq!(start.promote(PieceKind::Queen), start);

        // Moving a pinned piece into self-check.
        let pinned = Position::from_fen("4r1k1/8/8/8/8/8/4N3/4K3 w - - 0 1").expect("FEN should parse");
        assert_eq!(pinned.make_move(sq("e2"), sq("c3")), pinned);
    }

    #[test]
    fn selecting_then_clicking_destination_moves() {
        let start = Position::new_game();
        let selected = start.select_cell(sq("g1"));
        assert_eq!(selected.selected, Some(sq("g1")));
        assert_eq!(selected.legal_destinations, vec![sq("f3"), sq("h3")]);

        let moved = selected.select_cell(sq("f3"));
        assert_eq!(moved.side_to_move, Color::Black);
        assert!(moved.selected.is_none());
        assert!(moved.legal_destinations.is_empty());
        assert_eq!(moved.board.get(sq("f3")).map(|p| p.kind), Some(PieceKind::Knight));

        let deselected = selected.select_cell(sq("g1"));
        assert!(deselected.selected.is_none());

        assert_eq!(start.select_cell(sq("e7")), start);
    }

    #[test]
    fn selecting_own_rook_with_king_selected_castles() {
        let start = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let with_king = start.select_cell(sq("e1"));
        assert!(with_king.legal_destinations.contains(&sq("h1")));

        let castled = with_king.select_cell(sq("h1"));
        assert_eq!(castled.board.get(sq("g1")).map(|p| p.kind), Some(PieceKind::King));
        assert_eq!(castled.board.get(sq("f1")).map(|p| p.kind), Some(PieceKind::Rook));
        assert!(castled.board.is_empty(sq("e1")) && castled.board.is_empty(sq("h1")));
        assert_eq!(castled.king_square(Color::White), sq("g1"));
        assert_eq!(castled.side_to_move, Color::Black);
        assert!(castled.move_history[0].is_castle);

        let long = start.castle(sq("e1"), sq("a1"));
        assert_eq!(long.king_square(Color::White), sq("c1"));
        assert_eq!(long.board.get(sq("d1")).map(|p| p.kind), Some(PieceKind::Rook));

        // An ordinary king step is not a castle.
        assert_eq!(start.castle(sq("e1"), sq("e2")), start);
    }

    #[test]
    fn promotion_waits_for_piece_choice() {
        let start = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let pending = start.make_move(sq("a7"), sq("a8"));
        assert_eq!(pending.pending_promotion, Some(sq("a8")));
        assert_eq!(pending.side_to_move, Color::White);
        assert_eq!(pending.clock_ms(Color::White), start.clock_ms(Color::White));
        // Other input is refused until the choice is made.
        assert_eq!(pending.select_cell(sq("a1")), pending);
        assert_eq!(pending.promote(PieceKind::King), pending);

        let promoted = pending.promote(PieceKind::Knight);
        assert_eq!(promoted.board.get(sq("a8")).map(|p| p.kind), Some(PieceKind::Knight));
        assert_eq!(promoted.side_to_move, Color::Black);
        assert_eq!(promoted.pending_promotion, None);
        assert_eq!(promoted.move_history[0].promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn engine_move_applies_promotion_piece() {
        let start = Position::from_fen("7k/P7/8/8/8/8/8/K7 w - - 0 1").expect("FEN should parse");
        let next = start.apply_engine_move(&Move::promoting(sq("a7"), sq("a8"), PieceKind::Queen));
        assert_eq!(next.board.get(sq("a8")).map(|p| p.kind), Some(PieceKind::Queen));
        assert_eq!(next.side_to_move, Color::Black);
    }

    #[test]
    fn increment_is_capped_at_max_bank() {
        let clock = ClockSettings {
            initial_ms: 9_000,
            increment_ms: 2_000,
            max_bank_ms: 10_000,
        };
        let start = Position::new_game_with_clock(clock);
        let one = start.make_move(sq("e2"), sq("e4"));
        assert_eq!(one.clock_ms(Color::White), 10_000);

        let spent = one.update_clock(4_000);
        assert_eq!(spent.clock_ms(Color::Black), 5_000);
        let two = spent.make_move(sq("e7"), sq("e5"));
        assert_eq!(two.clock_ms(Color::Black), 7_000);
    }

    #[test]
    fn running_out_of_time_loses() {
        let start = Position::new_game();
        let flagged = start.update_clock(start.clock_ms(Color::White) + 1);
        assert_eq!(flagged.clock_ms(Color::White), 0);
        assert_eq!(flagged.result, GameResult::Black);

        let timed_out = start.timeout(Color::Black);
        assert_eq!(timed_out.result, GameResult::White);
        assert_eq!(timed_out.timeout(Color::White), timed_out);
    }

    #[test]
    fn reset_restores_start_with_same_clock_settings() {
        let clock = ClockSettings {
            initial_ms: 1_000,
            ..ClockSettings::default()
        };
        let played = Position::new_game_with_clock(clock).make_move(sq("d2"), sq("d4"));
        let reset = played.reset();
        assert_eq!(reset, Position::new_game_with_clock(clock));
    }
}
