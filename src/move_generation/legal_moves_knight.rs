use crate::game_state::chess_types::*;
use crate::move_generation::legal_move_shared::KNIGHT_JUMPS;

pub fn generate_knight_moves(board: &Board, from: Square, knight: Piece, out: &mut Vec<Move>) {
    for (dr, dc) in KNIGHT_JUMPS {
        let Some(to) = offset_square(from, dr, dc) else {
            continue;
        };
        if board.color_at(to) != Some(knight.color) {
            out.push(Move::new(from, to));
        }
    }
}
