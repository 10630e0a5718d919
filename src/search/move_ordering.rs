//! Move ordering: TT move, MVV-LVA captures, killers, then history.
//!
//! The killer and history tables live in `SearchHeuristics`, which the
//! search keeps alive across requests so later searches start warm.

use std::cmp::Reverse;

use crate::game_state::chess_types::*;
use crate::search::board_scoring::piece_value;
use crate::search::search_position::SearchPosition;

pub const MAX_PLY: usize = 128;

const TT_MOVE_SCORE: i32 = 1_000_000;
const CAPTURE_BASE: i32 = 100_000;
const PRIMARY_KILLER_SCORE: i32 = 80_000;
const SECONDARY_KILLER_SCORE: i32 = 70_000;
const HISTORY_CAP: i32 = 50_000;

type HistoryTable = [[[i32; 64]; 64]; 2];

#[derive(Debug, Clone)]
pub struct SearchHeuristics {
    killers: Box<[[Option<Move>; 2]; MAX_PLY]>,
    history: Box<HistoryTable>,
}

impl Default for SearchHeuristics {
    fn default() -> Self {
        Self {
            killers: Box::new([[None; 2]; MAX_PLY]),
            history: Box::new([[[0; 64]; 64]; 2]),
        }
    }
}

impl SearchHeuristics {
    pub fn clear(&mut self) {
        self.killers.fill([None; 2]);
        for side in self.history.iter_mut() {
            for from in side.iter_mut() {
                from.fill(0);
            }
        }
    }

    #[inline]
    pub fn killers_at(&self, ply: usize) -> [Option<Move>; 2] {
        self.killers.get(ply).copied().unwrap_or([None; 2])
    }

    pub fn record_killer(&mut self, ply: usize, mv: Move) {
        let Some(slot) = self.killers.get_mut(ply) else {
            return;
        };
        if slot[0].is_some_and(|k| k.same_as(&mv)) {
            return;
        }
        slot[1] = slot[0];
        slot[0] = Some(mv);
    }

    pub fn record_history(&mut self, side: Color, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.history[side.index()][mv.from as usize][mv.to as usize];
        *entry = (*entry + bonus).min(HISTORY_CAP);
    }

    #[inline]
    pub fn history_score(&self, side: Color, mv: &Move) -> i32 {
        self.history[side.index()][mv.from as usize][mv.to as usize]
    }
}

/// Ordering key for `mv`; larger is searched first.
pub fn move_order_score(
    position: &SearchPosition,
    mv: &Move,
    tt_move: Option<Move>,
    killers: [Option<Move>; 2],
    heuristics: &SearchHeuristics,
) -> i32 {
    if tt_move.is_some_and(|t| t.same_as(mv)) {
        return TT_MOVE_SCORE;
    }

    let board = position.board();
    if position.is_tactical(mv) {
        let attacker = board.get(mv.from).map_or(0, |p| piece_value(p.kind));
        let victim = if position.is_capture(mv) {
            board.get(mv.to).map_or(0, |p| piece_value(p.kind))
        } else {
            0
        };
        let promotion = mv.promotion.map_or(0, piece_value);
        return CAPTURE_BASE + victim - attacker + promotion;
    }

    if killers[0].is_some_and(|k| k.same_as(mv)) {
        return PRIMARY_KILLER_SCORE;
    }
    if killers[1].is_some_and(|k| k.same_as(mv)) {
        return SECONDARY_KILLER_SCORE;
    }

    heuristics.history_score(position.side_to_move(), mv)
}

/// Sort `moves` best-first. Ties keep generation order.
pub fn order_moves(
    position: &SearchPosition,
    moves: &mut [Move],
    tt_move: Option<Move>,
    ply: usize,
    heuristics: &SearchHeuristics,
) {
    let killers = heuristics.killers_at(ply);
    moves.sort_by_cached_key(|mv| {
        Reverse(move_order_score(position, mv, tt_move, killers, heuristics))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fen_parser::parse_fen;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn setup(fen: &str) -> (Position, SearchPosition) {
        let position = parse_fen(fen).expect("FEN should parse");
        let search = SearchPosition::from_position(&position);
        (position, search)
    }

    fn lan(position: &Position, text: &str) -> Move {
        long_algebraic_to_move(text, &position.board).expect("move should parse")
    }

    #[test]
    fn tt_move_then_captures_by_mvv_lva() {
        // Pawn and queen can both take the rook; the queen can also take a pawn.
        let (position, mut search) = setup("4k3/8/8/2r1p3/1P6/8/8/2Q1K3 w - - 0 1");
        let mut moves = search.legal_moves().expect("movegen");
        let heuristics = SearchHeuristics::default();
        let tt_move = lan(&position, "e1d2");
        order_moves(&search, &mut moves, Some(tt_move), 0, &heuristics);

        assert!(moves[0].same_as(&tt_move));
        assert!(moves[1].same_as(&lan(&position, "b4c5")));
        assert!(moves[2].same_as(&lan(&position, "c1c5")));
    }

    #[test]
    fn killers_precede_history_for_quiet_moves() {
        let (position, mut search) = setup("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let mut heuristics = SearchHeuristics::default();
        let killer = lan(&position, "a1a5");
        let historic = lan(&position, "a1a7");
        heuristics.record_history(Color::White, historic, 6);
        heuristics.record_killer(3, killer);

        let mut moves = search.legal_moves().expect("movegen");
        order_moves(&search, &mut moves, None, 3, &heuristics);
        assert!(moves[0].same_as(&killer));
        assert!(moves[1].same_as(&historic));

        // Killers are per ply.
        order_moves(&search, &mut moves, None, 4, &heuristics);
        assert!(moves[0].same_as(&historic));
    }

    #[test]
    fn killer_slots_shift_and_history_is_capped() {
        let mut heuristics = SearchHeuristics::default();
        let first = Move::new(1, 2);
        let second = Move::new(3, 4);
        heuristics.record_killer(0, first);
        heuristics.record_killer(0, first);
        heuristics.record_killer(0, second);
        assert_eq!(heuristics.killers_at(0), [Some(second), Some(first)]);
        assert_eq!(heuristics.killers_at(MAX_PLY + 5), [None, None]);

        for _ in 0..2000 {
            heuristics.record_history(Color::Black, first, 10);
        }
        assert_eq!(heuristics.history_score(Color::Black, &first), HISTORY_CAP);
        heuristics.clear();
        assert_eq!(heuristics.history_score(Color::Black, &first), 0);
    }
}
