//! Engine abstraction layer used by the search worker.
//!
//! Defines the difficulty tiers, their search limits and the output payload
//! so different engine strategies can be selected at runtime behind a single
//! trait interface.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::engines::engine_iterative::IterativeEngine;
use crate::engines::engine_random::RandomEngine;
use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::Move;
use crate::game_state::position::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Difficulty {
    /// Uniformly random legal move, no search.
    Random,
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Random,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    /// Fixed depth and wall-clock budget for this tier.
    pub const fn limits(self) -> SearchLimits {
        match self {
            Difficulty::Random => SearchLimits {
                max_depth: 0,
                movetime_ms: 0,
            },
            Difficulty::Easy => SearchLimits {
                max_depth: 2,
                movetime_ms: 500,
            },
            Difficulty::Medium => SearchLimits {
                max_depth: 4,
                movetime_ms: 1_500,
            },
            Difficulty::Hard => SearchLimits {
                max_depth: 6,
                movetime_ms: 3_000,
            },
        }
    }

    #[inline]
    pub const fn is_random(self) -> bool {
        matches!(self, Difficulty::Random)
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Random => "random",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for Difficulty {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" | "0" => Ok(Difficulty::Random),
            "easy" | "1" => Ok(Difficulty::Easy),
            "medium" | "2" => Ok(Difficulty::Medium),
            "hard" | "3" => Ok(Difficulty::Hard),
            _ => Err(ChessError::InvalidOptionValue {
                name: "Difficulty".to_owned(),
                value: s.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_depth: u8,
    pub movetime_ms: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// `None` only when the side to move has no legal move.
    pub best_move: Option<Move>,
    pub score: i32,
    pub depth: u8,
    pub nodes: u64,
    pub from_book: bool,
    pub info_lines: Vec<String>,
}

pub trait Engine: Send {
    fn name(&self) -> &str;

    fn new_game(&mut self) {}

    fn set_option(&mut self, name: &str, _value: &str) -> ChessResult<()> {
        Err(ChessError::UnknownOption(name.to_owned()))
    }

    fn choose_move(
        &mut self,
        position: &Position,
        limits: &SearchLimits,
    ) -> ChessResult<EngineOutput>;
}

/// A fresh engine suited to `difficulty`.
pub fn engine_for_difficulty(difficulty: Difficulty) -> Box<dyn Engine> {
    if difficulty.is_random() {
        Box::new(RandomEngine::new())
    } else {
        Box::new(IterativeEngine::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_names_and_levels() {
        for difficulty in Difficulty::ALL {
            let parsed: Difficulty = difficulty.to_string().parse().expect("round trip");
            assert_eq!(parsed, difficulty);
        }
        assert_eq!("3".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" Easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!(matches!(
            "grandmaster".parse::<Difficulty>(),
            Err(ChessError::InvalidOptionValue { .. })
        ));
    }

    #[test]
    fn harder_tiers_search_deeper_for_longer() {
        let limits: Vec<SearchLimits> = Difficulty::ALL.iter().map(|d| d.limits()).collect();
        for pair in limits.windows(2) {
            assert!(pair[0].max_depth < pair[1].max_depth);
            assert!(pair[0].movetime_ms < pair[1].movetime_ms);
        }
    }

    #[test]
    fn factory_picks_engine_by_tier() {
        assert_eq!(engine_for_difficulty(Difficulty::Random).name(), RandomEngine::NAME);
        assert_eq!(engine_for_difficulty(Difficulty::Hard).name(), IterativeEngine::NAME);
    }
}
