//! FEN-to-Position parser.
//!
//! Builds an interactive `Position` from a Forsyth-Edwards Notation string.
//! The grid has no separate castling-rights field, so the castling letters
//! are folded into the pieces' `has_moved` flags: a king or rook counts as
//! unmoved only when it stands on its home square and a matching right is
//! present.
//!
//! Only the board and side fields are required. Castling defaults to `-`;
//! the en-passant, halfmove and fullmove fields are validated when present
//! and otherwise ignored.

use crate::errors::{ChessError, ChessResult};
use crate::game_state::chess_types::*;
use crate::game_state::position::ClockSettings;
use crate::utils::algebraic::algebraic_to_square;

#[derive(Debug, Clone, Copy, Default)]
struct CastleFlags {
    /// `[white, black]` kingside rights.
    kingside: [bool; 2],
    /// `[white, black]` queenside rights.
    queenside: [bool; 2],
}

pub fn parse_fen(fen: &str) -> ChessResult<Position> {
    let fields: Vec<&str> = fen.split_whitespace().collect();
    if fields.len() < 2 {
        return Err(ChessError::InvalidFen(format!(
            "expected at least board and side fields, got {}",
            fields.len()
        )));
    }
    if fields.len() > 6 {
        return Err(ChessError::InvalidFen("FEN has extra trailing fields".to_owned()));
    }

    let mut board = parse_board(fields[0])?;
    let side_to_move = parse_side_to_move(fields[1])?;
    let castling = parse_castling_rights(fields.get(2).copied().unwrap_or("-"))?;

    if let Some(&en_passant) = fields.get(3) {
        if en_passant != "-" {
            algebraic_to_square(en_passant)
                .map_err(|_| ChessError::InvalidFen(format!("invalid en-passant square: {en_passant}")))?;
        }
    }
    for &counter in fields.iter().skip(4) {
        counter
            .parse::<u32>()
            .map_err(|_| ChessError::InvalidFen(format!("invalid move counter: {counter}")))?;
    }

    apply_moved_flags(&mut board, castling);

    for color in [Color::White, Color::Black] {
        let kings = board
            .pieces()
            .filter(|(_, p)| p.kind == PieceKind::King && p.color == color)
            .count();
        if kings != 1 {
            return Err(ChessError::InvalidFen(format!(
                "expected exactly one {color:?} king, found {kings}"
            )));
        }
    }

    Ok(Position::from_board(board, side_to_move, ClockSettings::default()))
}

fn parse_board(board_part: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(ChessError::InvalidFen("board layout must contain 8 ranks".to_owned()));
    }

    let mut board = Board::empty();
    // FEN lists rank 8 first, which is grid row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(ChessError::InvalidFen(format!("invalid empty-square count '{ch}'")));
                }
                let empty_count = empty_count as u8;
                if col + empty_count > 8 {
                    return Err(ChessError::InvalidFen("board rank has too many files".to_owned()));
                }
                col += empty_count;
                continue;
            }

            let (color, kind) = piece_from_fen_char(ch).ok_or_else(|| {
                ChessError::InvalidFen(format!("invalid piece character '{ch}' in board layout"))
            })?;
            if col >= 8 {
                return Err(ChessError::InvalidFen("board rank has too many files".to_owned()));
            }

            board.set(make_square(row as u8, col), Some(Piece::new(kind, color)));
            col += 1;
        }

        if col != 8 {
            return Err(ChessError::InvalidFen("board rank does not sum to 8 files".to_owned()));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(ChessError::InvalidFen(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastleFlags> {
    let mut flags = CastleFlags::default();
    if castling_part == "-" {
        return Ok(flags);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => flags.kingside[Color::White.index()] = true,
            'Q' => flags.queenside[Color::White.index()] = true,
            'k' => flags.kingside[Color::Black.index()] = true,
            'q' => flags.queenside[Color::Black.index()] = true,
            _ => {
                return Err(ChessError::InvalidFen(format!(
                    "invalid castling rights character: {ch}"
                )))
            }
        }
    }

    Ok(flags)
}

/// Mark every piece as moved except kings and rooks that still hold a
/// castling right and pawns on their starting row.
fn apply_moved_flags(board: &mut Board, castling: CastleFlags) {
    let squares: Vec<(Square, Piece)> = board.pieces().collect();
    for (square, piece) in squares {
        let row = square_row(square);
        let col = square_col(square);
        let side = piece.color.index();
        let home = row == piece.color.back_row();

        let unmoved = match piece.kind {
            PieceKind::Pawn => row == piece.color.pawn_start_row(),
            PieceKind::King => {
                home && col == 4 && (castling.kingside[side] || castling.queenside[side])
            }
            PieceKind::Rook => {
                home && ((col == 7 && castling.kingside[side])
                    || (col == 0 && castling.queenside[side]))
            }
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
        };

        if !unmoved {
            board.set(square, Some(piece.moved()));
        }
    }
}

fn piece_from_fen_char(ch: char) -> Option<(Color, PieceKind)> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let kind = match ch.to_ascii_lowercase() {
        'p' => PieceKind::Pawn,
        'n' => PieceKind::Knight,
        'b' => PieceKind::Bishop,
        'r' => PieceKind::Rook,
        'q' => PieceKind::Queen,
        'k' => PieceKind::King,
        _ => return None,
    };

    Some((color, kind))
}
