//! Random-move engine for the lowest difficulty tier.
//!
//! Selects uniformly from legal moves without any search.

use rand::prelude::IndexedRandom;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use crate::engines::engine_trait::{Engine, EngineOutput, SearchLimits};
use crate::errors::ChessResult;
use crate::game_state::position::Position;
use crate::move_generation::legal_move_generator::all_legal_moves;

pub struct RandomEngine {
    rng: StdRng,
}

impl RandomEngine {
    pub const NAME: &'static str = "Arcade Random";

    pub fn new() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic picks, for tests and reproducible self-play.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine for RandomEngine {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn choose_move(
        &mut self,
        position: &Position,
        _limits: &SearchLimits,
    ) -> ChessResult<EngineOutput> {
        let legal_moves = all_legal_moves(&position.board, position.side_to_move);

        let mut out = EngineOutput::default();
        out.info_lines.push(format!(
            "info string random_engine legal_moves {}",
            legal_moves.len()
        ));

        out.best_move = legal_moves.as_slice().choose(&mut self.rng).copied();
        if let Some(mv) = out.best_move {
            info!(from = mv.from, to = mv.to, "random engine picked a move");
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::engine_trait::Difficulty;
    use crate::move_generation::legal_move_generator::is_legal_move;

    #[test]
    fn random_engine_picks_legal_moves() {
        let mut engine = RandomEngine::with_seed(42);
        let position = Position::new_game();
        let limits = Difficulty::Random.limits();
        for _ in 0..50 {
            let out = engine.choose_move(&position, &limits).expect("random move");
            let mv = out.best_move.expect("start position has moves");
            assert!(is_legal_move(&position.board, mv.from, mv.to));
            assert!(!out.from_book);
        }
    }

    #[test]
    fn seeded_engines_agree() {
        let position = Position::new_game();
        let limits = Difficulty::Random.limits();
        let mut a = RandomEngine::with_seed(7);
        let mut b = RandomEngine::with_seed(7);
        for _ in 0..10 {
            assert_eq!(
                a.choose_move(&position, &limits).expect("move").best_move,
                b.choose_move(&position, &limits).expect("move").best_move
            );
        }
    }

    #[test]
    fn no_move_when_mated() {
        let position = Position::from_fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3")
            .expect("FEN should parse");
        let mut engine = RandomEngine::with_seed(1);
        let out = engine
            .choose_move(&position, &Difficulty::Random.limits())
            .expect("random engine never fails");
        assert_eq!(out.best_move, None);
    }

    #[test]
    fn options_are_rejected() {
        let mut engine = RandomEngine::with_seed(1);
        assert!(engine.set_option("Hash", "16").is_err());
    }
}
