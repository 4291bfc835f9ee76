//! GameState-to-FEN renderer.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::utils::algebraic::square_to_algebraic;

pub fn generate_fen(game_state: &GameState) -> String {
    let board = generate_board_field(game_state);
    let side_to_move = match game_state.side_to_move {
        Color::White => "w",
        Color::Black => "b",
    };
    let castling = generate_castling_field(game_state.castling_rights);
    let en_passant = match game_state.en_passant_square {
        Some(square) => square_to_algebraic(square),
        None => "-".to_owned(),
    };

    format!(
        "{} {} {} {} {} {}",
        board,
        side_to_move,
        castling,
        en_passant,
        game_state.halfmove_clock,
        game_state.fullmove_number
    )
}

fn generate_board_field(game_state: &GameState) -> String {
    let mut out = String::new();

    for rank in (0..8u8).rev() {
        let mut empty_count = 0u8;

        for file in 0..8u8 {
            let piece = game_state.piece_on(make_square(file, rank));
            if piece.is_none() {
                empty_count += 1;
                continue;
            }
            if empty_count > 0 {
                out.push(char::from(b'0' + empty_count));
                empty_count = 0;
            }
            out.push(piece_to_fen_char(piece));
        }

        if empty_count > 0 {
            out.push(char::from(b'0' + empty_count));
        }
        if rank > 0 {
            out.push('/');
        }
    }

    out
}

fn piece_to_fen_char(piece: Piece) -> char {
    let base = match piece.piece_type() {
        PieceType::Pawn => 'p',
        PieceType::Knight => 'n',
        PieceType::Bishop => 'b',
        PieceType::Rook => 'r',
        PieceType::Queen => 'q',
        PieceType::King => 'k',
        PieceType::None => return ' ',
    };

    match piece.color() {
        Color::White => base.to_ascii_uppercase(),
        Color::Black => base,
    }
}

fn generate_castling_field(rights: CastlingRights) -> String {
    let mut out = String::new();

    if rights & CASTLE_WHITE_KINGSIDE != 0 {
        out.push('K');
    }
    if rights & CASTLE_WHITE_QUEENSIDE != 0 {
        out.push('Q');
    }
    if rights & CASTLE_BLACK_KINGSIDE != 0 {
        out.push('k');
    }
    if rights & CASTLE_BLACK_QUEENSIDE != 0 {
        out.push('q');
    }

    if out.is_empty() {
        out.push('-');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::generate_fen;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_apply::make_move_in_place;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::moves::move_descriptions::move_to_uci;
    use crate::utils::fen_parser::parse_fen;

    #[test]
    fn round_trip_starting_position_fen() {
        let parsed = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");
        assert_eq!(generate_fen(&parsed), STARTING_POSITION_FEN);
    }

    #[test]
    fn round_trip_custom_position_fen() {
        let fen = "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQ1RK1 b kq - 4 6";
        let parsed = parse_fen(fen).expect("custom FEN should parse");
        let generated = generate_fen(&parsed);
        assert_eq!(generated, fen);

        let reparsed = parse_fen(&generated).expect("generated FEN should parse");
        assert_eq!(reparsed, parsed);
    }

    #[test]
    fn en_passant_target_appears_only_when_capturable() {
        let mut with_attacker =
            parse_fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = generate_legal_moves(&mut with_attacker);
        let push = moves
            .iter()
            .copied()
            .find(|m| move_to_uci(*m) == "e2e4")
            .expect("e2e4 should be legal");
        make_move_in_place(&mut with_attacker, push);
        assert!(generate_fen(&with_attacker).contains(" e3 "));

        let mut without_attacker =
            parse_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        let moves = generate_legal_moves(&mut without_attacker);
        let push = moves
            .iter()
            .copied()
            .find(|m| move_to_uci(*m) == "e2e4")
            .expect("e2e4 should be legal");
        make_move_in_place(&mut without_attacker, push);
        assert!(generate_fen(&without_attacker).contains(" - "));
    }

    #[test]
    fn fen_round_trips_along_a_played_line() {
        let mut game = GameState::new_game();
        for uci in ["e2e4", "c7c5", "g1f3", "d7d6", "f1b5", "c8d7", "e1g1"] {
            let moves = generate_legal_moves(&mut game);
            let mv = moves
                .iter()
                .copied()
                .find(|m| move_to_uci(*m) == uci)
                .unwrap_or_else(|| panic!("move {uci} should be legal"));
            make_move_in_place(&mut game, mv);

            let fen = generate_fen(&game);
            let reparsed = parse_fen(&fen).expect("rendered FEN should parse");
            assert_eq!(reparsed.board, game.board);
            assert_eq!(reparsed.side_to_move, game.side_to_move);
            assert_eq!(reparsed.castling_rights, game.castling_rights);
            assert_eq!(reparsed.en_passant_square, game.en_passant_square);
            assert_eq!(reparsed.halfmove_clock, game.halfmove_clock);
            assert_eq!(reparsed.fullmove_number, game.fullmove_number);
            assert_eq!(reparsed.zobrist_key, game.zobrist_key);
        }
    }
}
