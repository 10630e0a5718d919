//! Square conversions for algebraic coordinates.
//!
//! Converts between human-readable coordinates (e.g., `e4`) and grid square
//! indices. Rank 8 lives on row 0, so `a8` is square 0 and `h1` is square 63.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::{make_square, square_col, square_row, Square};

/// Convert algebraic notation (for example: "e4") to a square index.
#[inline]
pub fn algebraic_to_square(square: &str) -> ChessResult<Square> {
    let bytes = square.as_bytes();
    if bytes.len() != 2 {
        return Err(ChessError::InvalidAlgebraic(square.to_owned()));
    }

    let file = bytes[0];
    let rank = bytes[1];
    if !(b'a'..=b'h').contains(&file) || !(b'1'..=b'8').contains(&rank) {
        return Err(ChessError::InvalidAlgebraic(square.to_owned()));
    }

    let col = file - b'a';
    let row = b'8' - rank;
    Ok(make_square(row, col))
}

/// Convert a square index (`0..=63`) to algebraic notation (for example: "e4").
#[inline]
pub fn square_to_algebraic(square: Square) -> ChessResult<String> {
    if square > 63 {
        return Err(ChessError::InvalidSquare(square));
    }

    let file_char = char::from(b'a' + square_col(square));
    let rank_char = char::from(b'8' - square_row(square));
    Ok(format!("{file_char}{rank_char}"))
}

#[cfg(test)]
mod tests {
    use super::{algebraic_to_square, square_to_algebraic};
    use crate::errors::ChessError;

    #[test]
    fn corner_squares_map_to_grid_indices() {
        assert_eq!(algebraic_to_square("a8").expect("a8 should parse"), 0);
        assert_eq!(algebraic_to_square("h1").expect("h1 should parse"), 63);
        assert_eq!(algebraic_to_square("e1").expect("e1 should parse"), 60);
        assert_eq!(square_to_algebraic(0).expect("0 should convert"), "a8");
        assert_eq!(square_to_algebraic(36).expect("36 should convert"), "e4");
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(matches!(
            algebraic_to_square("i1"),
            Err(ChessError::InvalidAlgebraic(_))
        ));
        assert!(algebraic_to_square("a9").is_err());
        assert!(algebraic_to_square("e").is_err());
        assert_eq!(square_to_algebraic(64), Err(ChessError::InvalidSquare(64)));
    }
}
