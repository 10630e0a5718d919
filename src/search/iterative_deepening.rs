//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! - Transposition-table probe, bound tightening and cutoffs.
//! - Move ordering by TT move, MVV-LVA, killers and history.
//! - Capture/promotion quiescence with a bounded extra depth.
//! - Wall-clock budget checked every `node_check_interval` nodes.
//!
//! Aborting is not an error: an aborted node reports `None`, the recursion
//! unwinds, and the caller keeps the move from the last completed depth.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::errors::ChessResult;
use crate::game_state::chess_types::Move;
use crate::search::board_scoring::BoardScorer;
pub use crate::search::board_scoring::MATE_SCORE;
use crate::search::move_ordering::{order_moves, SearchHeuristics};
use crate::search::search_position::SearchPosition;
use crate::search::transposition_table::{Bound, TTEntry, TTStats, TranspositionTable};
use crate::utils::long_algebraic::move_to_long_algebraic;

const INFINITY: i32 = MATE_SCORE + 1;
const MATE_TT_THRESHOLD: i32 = MATE_SCORE - 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_depth: u8,
    /// Wall-clock budget; `None` searches every depth to completion.
    pub movetime_ms: Option<u64>,
    /// Extra plies of capture/promotion search below the horizon.
    pub quiescence_depth: u8,
    /// Nodes between two clock reads.
    pub node_check_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            movetime_ms: None,
            quiescence_depth: 4,
            node_check_interval: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    /// Score of `best_move` from the side to move's perspective.
    pub best_score: i32,
    /// Last fully completed depth.
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    /// True when the budget ran out before `max_depth` completed.
    pub aborted: bool,
    pub tt_stats: TTStats,
}

/// Per-search state threaded through the recursion.
struct SearchContext<'a, S: BoardScorer> {
    scorer: &'a S,
    tt: &'a mut TranspositionTable,
    heuristics: &'a mut SearchHeuristics,
    deadline: Option<Instant>,
    node_check_interval: u64,
    quiescence_depth: u8,
    nodes: u64,
    aborted: bool,
}

impl<S: BoardScorer> SearchContext<'_, S> {
    /// Count a node and report whether the search must unwind.
    #[inline]
    fn visit(&mut self) -> bool {
        self.nodes += 1;
        if !self.aborted
            && self.nodes % self.node_check_interval == 0
            && self.deadline.is_some_and(|limit| Instant::now() >= limit)
        {
            self.aborted = true;
        }
        self.aborted
    }
}

/// Score for a side with no legal moves, `ply` half-moves below the root.
///
/// Mate scores shrink with distance so shorter mates are preferred.
#[inline]
pub fn terminal_score(in_check: bool, ply: usize) -> i32 {
    if in_check {
        -MATE_SCORE + ply as i32
    } else {
        0
    }
}

#[inline]
fn tt_score_for_storage(score: i32, ply: usize) -> i32 {
    if score >= MATE_TT_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_TT_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

#[inline]
fn tt_score_from_storage(score: i32, ply: usize) -> i32 {
    if score >= MATE_TT_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_TT_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

pub fn iterative_deepening_search<S: BoardScorer>(
    position: &mut SearchPosition,
    scorer: &S,
    config: &SearchConfig,
    tt: &mut TranspositionTable,
    heuristics: &mut SearchHeuristics,
) -> ChessResult<SearchResult> {
    let started_at = Instant::now();
    let deadline = config
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));

    let mut root_moves = position.legal_moves()?;
    if root_moves.is_empty() || config.max_depth == 0 {
        let best_score = if root_moves.is_empty() {
            terminal_score(position.in_check(), 0)
        } else {
            scorer.score(position)
        };
        return Ok(SearchResult {
            best_move: root_moves.first().copied(),
            best_score,
            nodes: 1,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
            tt_stats: tt.stats(),
            ..SearchResult::default()
        });
    }

    let mut ctx = SearchContext {
        scorer,
        tt,
        heuristics,
        deadline,
        node_check_interval: config.node_check_interval.max(1),
        quiescence_depth: config.quiescence_depth,
        nodes: 0,
        aborted: false,
    };

    if let [only_move] = root_moves[..] {
        let best_score = score_forced_move(&mut ctx, position, only_move)?;
        return Ok(SearchResult {
            best_move: Some(only_move),
            best_score,
            nodes: ctx.nodes,
            elapsed_ms: started_at.elapsed().as_millis() as u64,
            tt_stats: ctx.tt.stats(),
            ..SearchResult::default()
        });
    }

    let root_tt_move = ctx.tt.probe(position.hash()).and_then(|e| e.best_move);
    order_moves(position, &mut root_moves, root_tt_move, 0, ctx.heuristics);

    let mut result = SearchResult {
        best_move: root_moves.first().copied(),
        best_score: scorer.score(position),
        ..SearchResult::default()
    };

    for depth in 1..=config.max_depth {
        if deadline.is_some_and(|limit| Instant::now() >= limit) {
            result.aborted = true;
            break;
        }

        let Some((best_move, best_score)) =
            search_root(&mut ctx, position, &mut root_moves, depth)?
        else {
            result.aborted = true;
            break;
        };

        result.best_move = Some(best_move);
        result.best_score = best_score;
        result.reached_depth = depth;
        debug!(
            depth,
            score = best_score,
            nodes = ctx.nodes,
            best = %move_to_long_algebraic(&best_move).unwrap_or_default(),
            "depth complete"
        );
    }

    result.nodes = ctx.nodes;
    result.elapsed_ms = started_at.elapsed().as_millis() as u64;
    result.tt_stats = ctx.tt.stats();
    Ok(result)
}

/// Value of the only legal root move: a quiescence search of the child, or
/// its static score when the budget runs out first.
fn score_forced_move<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    position: &mut SearchPosition,
    mv: Move,
) -> ChessResult<i32> {
    let remaining = ctx.quiescence_depth;
    let undo = position.make_move(mv)?;
    let quiet = quiescence(ctx, position, -INFINITY, INFINITY, 1, remaining);
    let fallback = ctx.scorer.score(position);
    position.unmake_move(undo);
    Ok(-quiet?.unwrap_or(fallback))
}

/// Full-window search of every root move. The best move is moved to the
/// front of `root_moves` for the next iteration.
fn search_root<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    position: &mut SearchPosition,
    root_moves: &mut [Move],
    depth: u8,
) -> ChessResult<Option<(Move, i32)>> {
    if ctx.visit() {
        return Ok(None);
    }

    let mut alpha = -INFINITY;
    let beta = INFINITY;
    let mut best: Option<(usize, i32)> = None;

    for (index, &mv) in root_moves.iter().enumerate() {
        let undo = position.make_move(mv)?;
        let child = negamax(ctx, position, depth - 1, -beta, -alpha, 1);
        position.unmake_move(undo);
        let Some(score) = child? else {
            return Ok(None);
        };
        let score = -score;

        if best.map_or(true, |(_, best_score)| score > best_score) {
            best = Some((index, score));
        }
        alpha = alpha.max(score);
    }

    let Some((index, score)) = best else {
        return Ok(None);
    };
    root_moves[..=index].rotate_right(1);
    let best_move = root_moves[0];

    ctx.tt.store(
        position.hash(),
        TTEntry {
            depth,
            score: tt_score_for_storage(score, 0),
            bound: Bound::Exact,
            best_move: Some(best_move),
        },
    );
    Ok(Some((best_move, score)))
}

fn negamax<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    position: &mut SearchPosition,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    ply: usize,
) -> ChessResult<Option<i32>> {
    if depth == 0 {
        let remaining = ctx.quiescence_depth;
        return quiescence(ctx, position, alpha, beta, ply, remaining);
    }
    if ctx.visit() {
        return Ok(None);
    }

    let key = position.hash();
    let mut tt_move = None;
    if let Some(entry) = ctx.tt.probe(key) {
        tt_move = entry.best_move;
        if entry.depth >= depth {
            let score = tt_score_from_storage(entry.score, ply);
            match entry.bound {
                Bound::Exact => return Ok(Some(score)),
                Bound::Lower => alpha = alpha.max(score),
                Bound::Upper => beta = beta.min(score),
            }
            if alpha >= beta {
                return Ok(Some(score));
            }
        }
    }
    let window_alpha = alpha;

    let mut moves = position.legal_moves()?;
    if moves.is_empty() {
        return Ok(Some(terminal_score(position.in_check(), ply)));
    }
    order_moves(position, &mut moves, tt_move, ply, ctx.heuristics);

    let side = position.side_to_move();
    let mut best_score = -INFINITY;
    let mut best_move = None;

    for mv in moves {
        let quiet = !position.is_tactical(&mv);
        let undo = position.make_move(mv)?;
        let child = negamax(ctx, position, depth - 1, -beta, -alpha, ply + 1);
        position.unmake_move(undo);
        let Some(score) = child? else {
            return Ok(None);
        };
        let score = -score;

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            if quiet {
                ctx.heuristics.record_killer(ply, mv);
                ctx.heuristics.record_history(side, mv, depth);
            }
            break;
        }
    }

    let bound = if best_score <= window_alpha {
        Bound::Upper
    } else if best_score >= beta {
        Bound::Lower
    } else {
        Bound::Exact
    };
    ctx.tt.store(
        key,
        TTEntry {
            depth,
            score: tt_score_for_storage(best_score, ply),
            bound,
            best_move,
        },
    );

    Ok(Some(best_score))
}

/// Capture/promotion search below the horizon.
///
/// A side in check gets no stand-pat: it searches every evasion, and with no
/// evasion it is mated. Out of check, the static score bounds the node.
fn quiescence<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    position: &mut SearchPosition,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    remaining: u8,
) -> ChessResult<Option<i32>> {
    if ctx.visit() {
        return Ok(None);
    }

    let stand_pat = ctx.scorer.score(position);
    let mut moves = if position.in_check() {
        let evasions = position.legal_moves()?;
        if evasions.is_empty() {
            return Ok(Some(terminal_score(true, ply)));
        }
        if remaining == 0 {
            return Ok(Some(stand_pat));
        }
        evasions
    } else {
        if remaining == 0 || stand_pat >= beta {
            return Ok(Some(stand_pat));
        }
        alpha = alpha.max(stand_pat);
        position.legal_tactical_moves()?
    };
    order_moves(position, &mut moves, None, ply, ctx.heuristics);

    let mut best_score = if position.in_check() { -INFINITY } else { stand_pat };
    for mv in moves {
        let undo = position.make_move(mv)?;
        let child = quiescence(ctx, position, -beta, -alpha, ply + 1, remaining - 1);
        position.unmake_move(undo);
        let Some(score) = child? else {
            return Ok(None);
        };
        let score = -score;

        best_score = best_score.max(score);
        alpha = alpha.max(score);
        if alpha >= beta {
            break;
        }
    }

    Ok(Some(best_score))
}
