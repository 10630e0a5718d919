//! Perft: exhaustive move-path counting.
//!
//! Walks the game tree with the search position's make/unmake, so the counts
//! check the generator and the executor together.

use crate::errors::ChessResult;
use crate::search::search_position::SearchPosition;
use crate::utils::long_algebraic::move_to_long_algebraic;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: u64,
    pub captures: u64,
    pub castles: u64,
    pub promotions: u64,
    pub checks: u64,
    pub checkmates: u64,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
        self.checkmates += rhs.checkmates;
    }
}

/// Leaf statistics for every move path of length `depth`.
pub fn perft(position: &mut SearchPosition, depth: u8) -> ChessResult<PerftCounts> {
    if depth == 0 {
        return Ok(PerftCounts {
            nodes: 1,
            ..PerftCounts::default()
        });
    }

    let mut total = PerftCounts::default();
    for mv in position.legal_moves()? {
        let is_capture = position.is_capture(&mv);
        let undo = position.make_move(mv)?;
        if depth == 1 {
            let in_check = position.in_check();
            total.nodes += 1;
            total.captures += u64::from(is_capture);
            total.castles += u64::from(mv.is_castle);
            total.promotions += u64::from(mv.promotion.is_some());
            total.checks += u64::from(in_check);
            if in_check && position.legal_moves()?.is_empty() {
                total.checkmates += 1;
            }
        } else {
            total.merge(perft(position, depth - 1)?);
        }
        position.unmake_move(undo);
    }
    Ok(total)
}

/// Per-root-move node counts, sorted by move text.
pub fn perft_divide(position: &mut SearchPosition, depth: u8) -> ChessResult<Vec<(String, u64)>> {
    let mut rows = Vec::new();
    if depth == 0 {
        return Ok(rows);
    }
    for mv in position.legal_moves()? {
        let undo = position.make_move(mv)?;
        let nodes = perft(position, depth - 1)?.nodes;
        position.unmake_move(undo);
        rows.push((move_to_long_algebraic(&mv)?, nodes));
    }
    rows.sort();
    Ok(rows)
}
