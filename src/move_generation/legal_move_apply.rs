//! In-place move application and reversal.
//!
//! `make_move_in_place` applies every side effect of a pseudo-legal move and
//! pushes an undo record; `unmake_move_in_place` is its exact inverse, down
//! to the zobrist key. The en-passant target survives a double push only
//! when an enemy pawn could actually capture there, so the field reaches the
//! hash and FEN output only when it is meaningful.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::game_state::undo_state::UndoState;
use crate::moves::move_descriptions::{
    move_flag, move_from, move_to, moved_piece, promotion_piece, Move, MoveFlag,
};
use crate::moves::pawn_moves::pawn_attacks;
use crate::search::zobrist::compute_zobrist_key;

pub fn make_move_in_place(game_state: &mut GameState, mv: Move) {
    let from = move_from(mv);
    let to = move_to(mv);
    let flag = move_flag(mv);
    let moved_type = moved_piece(mv);
    let us = game_state.side_to_move;
    let them = us.opposite();

    let moving = game_state.piece_on(from);
    assert!(!moving.is_none(), "make_move: empty from-square");
    assert!(from != to, "make_move: degenerate move");

    let mut undo = UndoState {
        mv,
        captured: None,
        prev_castling_rights: game_state.castling_rights,
        prev_en_passant_square: game_state.en_passant_square,
        prev_halfmove_clock: game_state.halfmove_clock,
        prev_fullmove_number: game_state.fullmove_number,
        prev_side_to_move: us,
        prev_zobrist_key: game_state.zobrist_key,
    };

    game_state.en_passant_square = None;

    if flag == MoveFlag::EnPassant {
        // The victim stands one rank behind the target, toward the mover.
        let capture_rank = match us {
            Color::White => square_rank(to) - 1,
            Color::Black => square_rank(to) + 1,
        };
        let capture_square = make_square(square_file(to), capture_rank);
        undo.captured = Some((game_state.piece_on(capture_square), capture_square));
        game_state.remove_piece(capture_square);
    } else if !game_state.piece_on(to).is_none() {
        undo.captured = Some((game_state.piece_on(to), to));
        game_state.remove_piece(to);
    }

    if flag == MoveFlag::Promotion {
        game_state.remove_piece(from);
        game_state.place_piece(Piece::make(us, promotion_piece(mv)), to);
    } else {
        game_state.move_piece(from, to);
    }

    if flag == MoveFlag::Castle {
        // H-rook to the F-file for kingside, A-rook to the D-file for
        // queenside, on the king's own rank.
        let rank = square_rank(to);
        if square_file(to) == 6 {
            game_state.move_piece(make_square(7, rank), make_square(5, rank));
        } else {
            game_state.move_piece(make_square(0, rank), make_square(3, rank));
        }
    }

    update_castling_rights(game_state, from, moving, undo.captured);

    if flag == MoveFlag::DoublePush {
        let passed_rank = match us {
            Color::White => square_rank(from) + 1,
            Color::Black => square_rank(from) - 1,
        };
        let ep_square = make_square(square_file(from), passed_rank);
        let enemy_pawns = game_state.pieces[them.index()][PieceType::Pawn.index()];
        if pawn_attacks(us, ep_square) & enemy_pawns != 0 {
            game_state.en_passant_square = Some(ep_square);
        }
    }

    if moved_type == PieceType::Pawn || undo.captured.is_some() {
        game_state.halfmove_clock = 0;
    } else {
        game_state.halfmove_clock += 1;
    }

    if us == Color::Black {
        game_state.fullmove_number += 1;
    }

    game_state.side_to_move = them;
    game_state.zobrist_key = compute_zobrist_key(game_state);
    game_state.undo_stack.push(undo);
}

pub fn unmake_move_in_place(game_state: &mut GameState) {
    let undo = match game_state.undo_stack.pop() {
        Some(undo) => undo,
        None => panic!("unmake_move: no move to undo"),
    };
    let mv = undo.mv;
    let from = move_from(mv);
    let to = move_to(mv);
    let flag = move_flag(mv);

    game_state.side_to_move = undo.prev_side_to_move;
    game_state.castling_rights = undo.prev_castling_rights;
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.halfmove_clock = undo.prev_halfmove_clock;
    game_state.fullmove_number = undo.prev_fullmove_number;

    if flag == MoveFlag::Promotion {
        game_state.remove_piece(to);
        game_state.place_piece(Piece::make(undo.prev_side_to_move, PieceType::Pawn), from);
    } else {
        game_state.move_piece(to, from);
    }

    if flag == MoveFlag::Castle {
        let rank = square_rank(to);
        if square_file(to) == 6 {
            game_state.move_piece(make_square(5, rank), make_square(7, rank));
        } else {
            game_state.move_piece(make_square(3, rank), make_square(0, rank));
        }
    }

    if let Some((captured, capture_square)) = undo.captured {
        game_state.place_piece(captured, capture_square);
    }

    game_state.zobrist_key = undo.prev_zobrist_key;
}

/// A king move drops both rights; a rook leaving or dying on its home corner
/// drops the matching one.
fn update_castling_rights(
    game_state: &mut GameState,
    from: Square,
    moving: Piece,
    captured: Option<(Piece, Square)>,
) {
    match moving {
        Piece::WhiteKing => {
            game_state.castling_rights &= !(CASTLE_WHITE_KINGSIDE | CASTLE_WHITE_QUEENSIDE);
        }
        Piece::BlackKing => {
            game_state.castling_rights &= !(CASTLE_BLACK_KINGSIDE | CASTLE_BLACK_QUEENSIDE);
        }
        Piece::WhiteRook => match from {
            0 => game_state.castling_rights &= !CASTLE_WHITE_QUEENSIDE,
            7 => game_state.castling_rights &= !CASTLE_WHITE_KINGSIDE,
            _ => {}
        },
        Piece::BlackRook => match from {
            56 => game_state.castling_rights &= !CASTLE_BLACK_QUEENSIDE,
            63 => game_state.castling_rights &= !CASTLE_BLACK_KINGSIDE,
            _ => {}
        },
        _ => {}
    }

    match captured {
        Some((Piece::WhiteRook, 0)) => game_state.castling_rights &= !CASTLE_WHITE_QUEENSIDE,
        Some((Piece::WhiteRook, 7)) => game_state.castling_rights &= !CASTLE_WHITE_KINGSIDE,
        Some((Piece::BlackRook, 56)) => game_state.castling_rights &= !CASTLE_BLACK_QUEENSIDE,
        Some((Piece::BlackRook, 63)) => game_state.castling_rights &= !CASTLE_BLACK_KINGSIDE,
        _ => {}
    }
}
