//! FEN-to-GameState parser.
//!
//! Builds fully-populated state from a Forsyth-Edwards Notation string. The
//! halfmove and fullmove fields are optional and default to 0 and 1. Loaded
//! positions are normalised to the engine's state invariants: castling
//! rights without their king and rook at home are cleared, and an
//! en-passant target survives only on the correct rank with an enemy pawn
//! able to capture there.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::pawn_moves::pawn_attacks;
use crate::utils::algebraic::algebraic_to_square;

pub fn parse_fen(fen: &str) -> Result<GameState, String> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or("Missing board layout in FEN")?;
    let side_part = parts.next().ok_or("Missing side-to-move in FEN")?;
    let castling_part = parts.next().ok_or("Missing castling rights in FEN")?;
    let en_passant_part = parts.next().ok_or("Missing en-passant square in FEN")?;
    let halfmove_part = parts.next();
    let fullmove_part = parts.next();

    if parts.next().is_some() {
        return Err("FEN has extra trailing fields".to_owned());
    }

    let mut game_state = GameState::new_empty();

    parse_board(board_part, &mut game_state)?;
    game_state.side_to_move = parse_side_to_move(side_part)?;
    game_state.castling_rights = parse_castling_rights(castling_part)?;
    game_state.en_passant_square = parse_en_passant_square(en_passant_part)?;
    game_state.halfmove_clock = match halfmove_part {
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| format!("Invalid halfmove clock: {text}"))?,
        None => 0,
    };
    game_state.fullmove_number = match fullmove_part {
        Some(text) => text
            .parse::<u16>()
            .map_err(|_| format!("Invalid fullmove number: {text}"))?,
        None => 1,
    };

    normalize_castling_rights(&mut game_state);
    normalize_en_passant_square(&mut game_state);
    game_state.rebuild_bitboards();

    Ok(game_state)
}

fn parse_board(board_part: &str, game_state: &mut GameState) -> Result<(), String> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err("Board layout must contain 8 ranks".to_owned());
    }

    for (fen_rank_index, rank_str) in ranks.iter().enumerate() {
        let board_rank = 7 - fen_rank_index as u8;
        let mut file = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(format!("Invalid empty-square count '{ch}'"));
                }
                file += empty_count as u8;
                if file > 8 {
                    return Err("Board rank overflows 8 files".to_owned());
                }
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| format!("Invalid piece character '{ch}' in board layout"))?;

            if file >= 8 {
                return Err("Board rank has too many files".to_owned());
            }

            game_state.board[make_square(file, board_rank) as usize] = piece;
            file += 1;
        }

        if file != 8 {
            return Err("Board rank does not sum to 8 files".to_owned());
        }
    }

    for color in [Color::White, Color::Black] {
        let kings = game_state
            .board
            .iter()
            .filter(|piece| **piece == Piece::make(color, PieceType::King))
            .count();
        if kings != 1 {
            return Err(format!("Expected exactly one king per side, found {kings}"));
        }
    }

    Ok(())
}

fn parse_side_to_move(side_part: &str) -> Result<Color, String> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(format!("Invalid side-to-move field: {side_part}")),
    }
}

fn parse_castling_rights(castling_part: &str) -> Result<CastlingRights, String> {
    if castling_part == "-" {
        return Ok(0);
    }

    let mut rights: CastlingRights = 0;
    for ch in castling_part.chars() {
        match ch {
            'K' => rights |= CASTLE_WHITE_KINGSIDE,
            'Q' => rights |= CASTLE_WHITE_QUEENSIDE,
            'k' => rights |= CASTLE_BLACK_KINGSIDE,
            'q' => rights |= CASTLE_BLACK_QUEENSIDE,
            _ => return Err(format!("Invalid castling rights character: {ch}")),
        }
    }

    Ok(rights)
}

fn parse_en_passant_square(en_passant_part: &str) -> Result<Option<Square>, String> {
    if en_passant_part == "-" {
        return Ok(None);
    }
    Ok(Some(algebraic_to_square(en_passant_part)?))
}

/// A castling right is only meaningful with the king and the matching rook
/// on their home squares.
fn normalize_castling_rights(game_state: &mut GameState) {
    let board = &game_state.board;
    if board[4] != Piece::WhiteKing {
        game_state.castling_rights &= !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE);
    }
    if board[7] != Piece::WhiteRook {
        game_state.castling_rights &= !CASTLE_WHITE_KINGSIDE;
    }
    if board[0] != Piece::WhiteRook {
        game_state.castling_rights &= !CASTLE_WHITE_QUEENSIDE;
    }
    if board[60] != Piece::BlackKing {
        game_state.castling_rights &= !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
    }
    if board[63] != Piece::BlackRook {
        game_state.castling_rights &= !CASTLE_BLACK_KINGSIDE;
    }
    if board[56] != Piece::BlackRook {
        game_state.castling_rights &= !CASTLE_BLACK_QUEENSIDE;
    }
}

/// The en-passant field is kept only when the side to move has a pawn that
/// could actually capture there, matching what make-move records.
fn normalize_en_passant_square(game_state: &mut GameState) {
    let Some(ep_square) = game_state.en_passant_square else {
        return;
    };

    let mover = game_state.side_to_move;
    let expected_rank = match mover {
        Color::White => 5,
        Color::Black => 2,
    };
    if square_rank(ep_square) != expected_rank {
        game_state.en_passant_square = None;
        return;
    }

    let mover_pawn = Piece::make(mover, PieceType::Pawn);
    let mut capturers = 0u64;
    for square in 0..64u8 {
        if game_state.board[square as usize] == mover_pawn {
            capturers |= pawn_attacks(mover, square);
        }
    }
    if capturers & (1u64 << ep_square) == 0 {
        game_state.en_passant_square = None;
    }
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    let piece_type = match ch.to_ascii_lowercase() {
        'p' => PieceType::Pawn,
        'n' => PieceType::Knight,
        'b' => PieceType::Bishop,
        'r' => PieceType::Rook,
        'q' => PieceType::Queen,
        'k' => PieceType::King,
        _ => return None,
    };

    Some(Piece::make(color, piece_type))
}
