use crate::game_state::chess_types::*;

/// Export a position as FEN.
///
/// Castling letters are derived from unmoved kings and rooks on their home
/// squares. The en-passant field is always `-`, the halfmove clock is `0`
/// and the fullmove number follows the recorded history.
pub fn generate_fen(position: &Position) -> String {
    let board = generate_board_field(&position.board);
    let side_to_move = match position.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(&position.board);
    let fullmove_number = position.move_history.len() / 2 + 1;

    format!("{board} {side_to_move} {castling} - 0 {fullmove_number}")
}

fn generate_board_field(board: &Board) -> String {
    let mut out = String::new();

    for row in 0..8u8 {
        let mut empty_count = 0u8;

        for col in 0..8u8 {
            if let Some(piece) = board.get(make_square(row, col)) {
                if empty_count > 0 {
                    out.push(char::from(b'0' + empty_count));
                    empty_count = 0;
                }
                out.push(piece_to_fen_char(piece));
            } else {
                empty_count += 1;
            }
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }

        if row < 7 {
            out.push('/');
        }
    }

    out
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.kind {
        PieceKind::Pawn => 'p',
        PieceKind::Knight => 'n',
        PieceKind::Bishop => 'b',
        PieceKind::Rook => 'r',
        PieceKind::Queen => 'q',
        PieceKind::King => 'k',
    };

    match piece.color {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}

fn generate_castling_field(board: &Board) -> String {
    let unmoved = |square: Square, kind: PieceKind, color: Color| {
        board
            .get(square)
            .is_some_and(|p| p.kind == kind && p.color == color && !p.has_moved)
    };

    let mut out = String::new();
    for (color, letters) in [(Color::White, ['K', 'Q']), (Color::Black, ['k', 'q'])] {
        let row = color.back_row();
        if !unmoved(make_square(row, 4), PieceKind::King, color) {
            continue;
        }
        if unmoved(make_square(row, 7), PieceKind::Rook, color) {
            out.push(letters[0]);
        }
        if unmoved(make_square(row, 0), PieceKind::Rook, color) {
            out.push(letters[1]);
        }
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}
