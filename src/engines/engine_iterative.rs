//! Searching engine for the Easy, Medium and Hard tiers.
//!
//! Consults the opening book first, then runs iterative deepening under the
//! tier's limits. The transposition table and the killer/history heuristics
//! are owned here and survive between `choose_move` calls, so consecutive
//! requests in one game start from a warm cache.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchLimits};
use crate::engines::time_management::resolve_movetime;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::position::Position;
use crate::search::board_scoring::PieceSquareScorer;
use crate::search::iterative_deepening::{iterative_deepening_search, SearchConfig};
use crate::search::move_ordering::SearchHeuristics;
use crate::search::search_position::SearchPosition;
use crate::search::transposition_table::{TranspositionTable, DEFAULT_TT_CAPACITY};
use crate::tables::opening_book::{default_book, OpeningBook};
use crate::utils::long_algebraic::move_to_long_algebraic;

const DEFAULT_QUIESCENCE_DEPTH: u8 = 4;
const DEFAULT_NODE_CHECK_INTERVAL: u64 = 1024;

pub struct IterativeEngine {
    tt: TranspositionTable,
    heuristics: SearchHeuristics,
    scorer: PieceSquareScorer,
    opening_book: &'static OpeningBook,
    use_own_book: bool,
    quiescence_depth: u8,
    node_check_interval: u64,
    rng: StdRng,
}

impl IterativeEngine {
    pub const NAME: &'static str = "Arcade Iterative";

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Deterministic book picks, for tests and reproducible self-play.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            tt: TranspositionTable::with_capacity(DEFAULT_TT_CAPACITY),
            heuristics: SearchHeuristics::default(),
            scorer: PieceSquareScorer,
            opening_book: default_book(),
            use_own_book: true,
            quiescence_depth: DEFAULT_QUIESCENCE_DEPTH,
            node_check_interval: DEFAULT_NODE_CHECK_INTERVAL,
            rng,
        }
    }

    #[inline]
    pub fn transposition_table(&self) -> &TranspositionTable {
        &self.tt
    }

    fn search_config(&self, position: &Position, limits: &SearchLimits) -> SearchConfig {
        SearchConfig {
            max_depth: limits.max_depth.max(1),
            movetime_ms: Some(resolve_movetime(position, limits)),
            quiescence_depth: self.quiescence_depth,
            node_check_interval: self.node_check_interval,
        }
    }
}

impl Default for IterativeEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_option<T: std::str::FromStr>(name: &str, value: &str) -> ChessResult<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| ChessError::InvalidOptionValue {
            name: name.to_owned(),
            value: value.to_owned(),
        })
}

impl Engine for IterativeEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn new_game(&mut self) {
        self.tt.clear();
        self.heuristics.clear();
    }

    fn set_option(&mut self, name: &str, value: &str) -> ChessResult<()> {
        if name.eq_ignore_ascii_case("OwnBook") {
            let v = value.trim().to_ascii_lowercase();
            self.use_own_book = match v.as_str() {
                "true" | "1" | "yes" | "on" => true,
                "false" | "0" | "no" | "off" => false,
                _ => return Err(ChessError::InvalidOptionValue {
                    name: name.to_owned(),
                    value: value.to_owned(),
                }),
            };
            return Ok(());
        }
        if name.eq_ignore_ascii_case("Hash") {
            let entries: usize = parse_option(name, value)?;
            self.tt.set_capacity(entries);
            return Ok(());
        }
        if name.eq_ignore_ascii_case("QuiescenceDepth") {
            self.quiescence_depth = parse_option(name, value)?;
            return Ok(());
        }
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    fn choose_move(
        &mut self,
        position: &Position,
        limits: &SearchLimits,
    ) -> ChessResult<EngineOutput> {
        if self.use_own_book {
            if let Some(book_move) = self.opening_book.choose_move(position, &mut self.rng) {
                let lan = move_to_long_algebraic(&book_move)?;
                info!(%lan, ply = position.move_history.len(), "opening book move");
                return Ok(EngineOutput {
                    best_move: Some(book_move),
                    from_book: true,
                    info_lines: vec!["info string opening book move".to_owned()],
                    ..EngineOutput::default()
                });
            }
        }

        let config = self.search_config(position, limits);
        let mut search_position = SearchPosition::from_position(position);
        let result = iterative_deepening_search(
            &mut search_position,
            &self.scorer,
            &config,
            &mut self.tt,
            &mut self.heuristics,
        )?;

        let mut out = EngineOutput {
            best_move: result.best_move,
            score: result.best_score,
            depth: result.reached_depth,
            nodes: result.nodes,
            from_book: false,
            info_lines: Vec::new(),
        };
        out.info_lines.push(format!(
            "info depth {} score cp {} nodes {} time {}",
            result.reached_depth, result.best_score, result.nodes, result.elapsed_ms
        ));
        out.info_lines.push(format!(
            "info string iterative_engine tt_hits {} tt_stores {} aborted {}",
            result.tt_stats.hits, result.tt_stats.stores, result.aborted
        ));

        if let Some(mv) = result.best_move {
            let lan = move_to_long_algebraic(&mv)?;
            info!(
                %lan,
                depth = result.reached_depth,
                score = result.best_score,
                nodes = result.nodes,
                elapsed_ms = result.elapsed_ms,
                "search finished"
            );
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_trait::Difficulty;
    use crate::move_generation::legal_move_generator::is_legal_move;
    use crate::utils::long_algebraic::long_algebraic_to_move;

    fn quick_limits() -> SearchLimits {
        SearchLimits {
            max_depth: 2,
            movetime_ms: 10_000,
        }
    }

    #[test]
    fn opening_position_is_answered_from_the_book() {
        let mut engine = IterativeEngine::with_seed(9);
        let position = Position::new_game();
        let out = engine
            .choose_move(&position, &Difficulty::Hard.limits())
            .expect("book move");
        assert!(out.from_book);
        let mv = out.best_move.expect("book suggestion");
        assert!(is_legal_move(&position.board, mv.from, mv.to));
        assert_eq!(out.nodes, 0);
    }

    #[test]
    fn book_can_be_disabled() {
        let mut engine = IterativeEngine::with_seed(9);
        engine.set_option("OwnBook", "false").expect("valid option");
        let out = engine
            .choose_move(&Position::new_game(), &quick_limits())
            .expect("search move");
        assert!(!out.from_book);
        assert!(out.nodes > 0);
        assert_eq!(out.depth, 2);
        assert!(out.info_lines[0].starts_with("info depth 2 score cp"));
    }

    #[test]
    fn search_finds_the_mate_in_one() {
        let position = Position::from_fen("6k1/5ppp/8/8/8/8/8/3QK3 w - - 0 1").expect("FEN should parse");
        let mut engine = IterativeEngine::with_seed(1);
        let out = engine.choose_move(&position, &quick_limits()).expect("search move");
        let expected = long_algebraic_to_move("d1d8", &position.board).expect("LAN");
        assert_eq!(out.best_move, Some(expected));
    }

    #[test]
    fn tables_persist_until_new_game() {
        let mut engine = IterativeEngine::with_seed(1);
        engine.set_option("OwnBook", "off").expect("valid option");
        let position = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        engine.choose_move(&position, &quick_limits()).expect("search move");
        assert!(!engine.transposition_table().is_empty());
        engine.new_game();
        assert!(engine.transposition_table().is_empty());
    }

    #[test]
    fn options_are_validated() {
        let mut engine = IterativeEngine::with_seed(1);
        assert!(engine.set_option("hash", "4096").is_ok());
        assert_eq!(engine.transposition_table().capacity(), 4096);
        assert!(engine.set_option("QuiescenceDepth", "2").is_ok());
        assert!(matches!(
            engine.set_option("Hash", "lots"),
            Err(ChessError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("OwnBook", "maybe"),
            Err(ChessError::InvalidOptionValue { .. })
        ));
        assert!(matches!(
            engine.set_option("Threads", "4"),
            Err(ChessError::UnknownOption(_))
        ));
    }
}
