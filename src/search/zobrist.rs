//! Zobrist hashing support for fast position identity.
//!
//! The keys are generated from a fixed seed so hashes are deterministic across
//! runs, which is useful for testing and debugging.
//!
//! Castling availability is not stored on the board directly; it is derived
//! from unmoved kings and rooks on their home squares (see [`castling_mask`])
//! and hashed as a 4-bit mask.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;

pub const CASTLE_WHITE_KINGSIDE: u8 = 1;
pub const CASTLE_WHITE_QUEENSIDE: u8 = 2;
pub const CASTLE_BLACK_KINGSIDE: u8 = 4;
pub const CASTLE_BLACK_QUEENSIDE: u8 = 8;

#[derive(Debug)]
struct ZobristTables {
    piece_square: [[[u64; 64]; 6]; 2],
    side_to_move: u64,
    castling: [u64; 16],
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x9E37_79B9_7F4A_7C15;

    let mut piece_square = [[[0u64; 64]; 6]; 2];
    for color in &mut piece_square {
        for piece in color {
            for sq in piece {
                *sq = next_random_u64(&mut seed);
            }
        }
    }

    let side_to_move = next_random_u64(&mut seed);

    let mut castling = [0u64; 16];
    // An empty mask hashes to zero so positions without castling add nothing.
    for key in castling.iter_mut().skip(1) {
        *key = next_random_u64(&mut seed);
    }

    ZobristTables {
        piece_square,
        side_to_move,
        castling,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Return the Zobrist key for a `(color, piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(color: Color, piece: PieceKind, square: Square) -> u64 {
    tables().piece_square[color.index()][piece.index()][square as usize]
}

/// Return the side-to-move toggle key (xor in when black to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Return the Zobrist key contribution for a castling mask (`0..=15`).
#[inline]
pub fn castling_key(mask: u8) -> u64 {
    tables().castling[(mask & 0x0F) as usize]
}

/// Castling availability implied by the `has_moved` flags on the board.
///
/// A wing is available while the king is unmoved on the e-file of its back
/// row and the matching corner rook is unmoved. Path and attack conditions
/// are not part of the mask.
pub fn castling_mask(board: &Board) -> u8 {
    let unmoved = |square: Square, kind: PieceKind, color: Color| {
        board
            .get(square)
            .is_some_and(|p| p.kind == kind && p.color == color && !p.has_moved)
    };

    let mut mask = 0u8;
    for (color, kingside, queenside) in [
        (Color::White, CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE),
        (Color::Black, CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE),
    ] {
        let row = color.back_row();
        if !unmoved(make_square(row, 4), PieceKind::King, color) {
            continue;
        }
        if unmoved(make_square(row, 7), PieceKind::Rook, color) {
            mask |= kingside;
        }
        if unmoved(make_square(row, 0), PieceKind::Rook, color) {
            mask |= queenside;
        }
    }
    mask
}

/// Compute the full position key from scratch.
pub fn compute_zobrist_key(board: &Board, side_to_move: Color) -> u64 {
    let mut key = board
        .pieces()
        .fold(0u64, |acc, (sq, p)| acc ^ piece_square_key(p.color, p.kind, sq));

    if side_to_move == Color::Black {
        key ^= side_to_move_key();
    }

    key ^ castling_key(castling_mask(board))
}
