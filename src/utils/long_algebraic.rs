use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_generator::legal_moves_from;
use crate::utils::algebraic::{algebraic_to_square, square_to_algebraic};

/// Render a move as long algebraic text (`e2e4`, `a7a8q`).
///
/// Castles are written as the king's two-file step (`e1g1`), not as the
/// internal king-onto-rook encoding.
pub fn move_to_long_algebraic(mv: &Move) -> ChessResult<String> {
    let to = if mv.is_castle {
        castle_destinations(mv.from, mv.to).0
    } else {
        mv.to
    };

    let mut out = String::with_capacity(5);
    out.push_str(&square_to_algebraic(mv.from)?);
    out.push_str(&square_to_algebraic(to)?);
    if let Some(kind) = mv.promotion {
        out.push(promotion_to_char(kind)?);
    }
    Ok(out)
}

/// Parse long algebraic text into a legal move on `board`.
///
/// Both castle spellings are accepted: the king's two-file step (`e1g1`) and
/// the king landing on its own rook (`e1h1`). The result always carries the
/// king-onto-rook encoding.
pub fn long_algebraic_to_move(long_algebraic: &str, board: &Board) -> ChessResult<Move> {
    let bytes = long_algebraic.as_bytes();
    if (bytes.len() != 4 && bytes.len() != 5) || !long_algebraic.is_ascii() {
        return Err(ChessError::InvalidAlgebraic(long_algebraic.to_owned()));
    }

    let from = algebraic_to_square(&long_algebraic[0..2])?;
    let to = algebraic_to_square(&long_algebraic[2..4])?;
    let promotion = match bytes.get(4) {
        Some(&ch) => Some(char_to_promotion(ch as char)?),
        None => None,
    };

    let piece = board
        .get(from)
        .ok_or_else(|| ChessError::EmptySquare(long_algebraic[0..2].to_owned()))?;

    let wanted = if piece.kind == PieceKind::King {
        let onto_own_rook = board
            .get(to)
            .is_some_and(|p| p.kind == PieceKind::Rook && p.color == piece.color);
        let col_delta = square_col(to) as i8 - square_col(from) as i8;
        if onto_own_rook {
            Move::castle(from, to)
        } else if col_delta.abs() == 2 && square_row(from) == square_row(to) {
            let rook_col = if col_delta > 0 { 7 } else { 0 };
            Move::castle(from, make_square(square_row(from), rook_col))
        } else {
            Move::new(from, to)
        }
    } else {
        Move {
            promotion,
            ..Move::new(from, to)
        }
    };

    legal_moves_from(board, from)
        .into_iter()
        .find(|mv| mv.same_as(&wanted))
        .ok_or_else(|| ChessError::IllegalMove(long_algebraic.to_owned()))
}

/// Space-separated long algebraic rendering of a move history.
pub fn history_to_long_algebraic(history: &[Move]) -> String {
    history
        .iter()
        .filter_map(|mv| move_to_long_algebraic(mv).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

fn promotion_to_char(kind: PieceKind) -> ChessResult<char> {
    match kind {
        PieceKind::Knight => Ok('n'),
        PieceKind::Bishop => Ok('b'),
        PieceKind::Rook => Ok('r'),
        PieceKind::Queen => Ok('q'),
        _ => Err(ChessError::InvalidAlgebraic(format!("{kind:?}"))),
    }
}

fn char_to_promotion(ch: char) -> ChessResult<PieceKind> {
    match ch.to_ascii_lowercase() {
        'n' => Ok(PieceKind::Knight),
        'b' => Ok(PieceKind::Bishop),
        'r' => Ok(PieceKind::Rook),
        'q' => Ok(PieceKind::Queen),
        _ => Err(ChessError::InvalidAlgebraic(ch.to_string())),
    }
}
