//! Terminal-oriented board renderer for debugging and test diagnostics.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

/// Render the board to a text grid, rank 8 first.
pub fn render_game_state(game_state: &GameState) -> String {
    let mut out = String::new();

    out.push_str("  a b c d e f g h\n");

    for rank in (0..8u8).rev() {
        out.push(char::from(b'1' + rank));
        out.push(' ');

        for file in 0..8u8 {
            out.push(piece_char(game_state.piece_on(make_square(file, rank))));
            if file < 7 {
                out.push(' ');
            }
        }

        out.push(' ');
        out.push(char::from(b'1' + rank));
        out.push('\n');
    }

    out.push_str("  a b c d e f g h");

    out
}

fn piece_char(piece: Piece) -> char {
    let base = match piece.piece_type() {
        PieceType::Pawn => 'p',
        PieceType::Knight => 'n',
        PieceType::Bishop => 'b',
        PieceType::Rook => 'r',
        PieceType::Queen => 'q',
        PieceType::King => 'k',
        PieceType::None => return '.',
    };
    match piece.color() {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}
