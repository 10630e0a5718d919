//! Per-move time budgeting.
//!
//! A difficulty tier carries a fixed budget; the mover's remaining clock caps
//! it at 1/20th so a low clock never loses on time to a long search.

use crate::engines::engine_trait::SearchLimits;
use crate::game_state::position::Position;

/// Fraction of the remaining clock a single move may use.
const CLOCK_FRACTION: u64 = 20;

pub fn resolve_movetime(position: &Position, limits: &SearchLimits) -> u64 {
    let remaining = position.clock_ms(position.side_to_move);
    let clock_share = (remaining / CLOCK_FRACTION).max(1);
    limits.movetime_ms.min(clock_share).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::chess_types::Color;

    #[test]
    fn tier_budget_applies_on_a_full_clock() {
        let position = Position::new_game();
        let limits = SearchLimits {
            max_depth: 4,
            movetime_ms: 1_500,
        };
        assert_eq!(resolve_movetime(&position, &limits), 1_500);
    }

    #[test]
    fn low_clock_caps_the_budget() {
        let mut position = Position::new_game();
        position.clocks_ms[Color::White.index()] = 4_000;
        let limits = SearchLimits {
            max_depth: 6,
            movetime_ms: 3_000,
        };
        assert_eq!(resolve_movetime(&position, &limits), 200);

        position.clocks_ms[Color::White.index()] = 0;
        assert_eq!(resolve_movetime(&position, &limits), 1);
    }
}
