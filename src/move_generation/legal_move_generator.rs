//! Full legal move generation pipeline.
//!
//! Piece-wise pseudo-legal generation followed by a make / king-attacked /
//! unmake filter. King-capturing moves are dropped outright; the generator
//! never produces them from a position satisfying the state invariants.

use crate::game_state::chess_types::PieceType;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::move_generation::legal_moves_bishop::generate_bishop_moves;
use crate::move_generation::legal_moves_king::generate_king_moves;
use crate::move_generation::legal_moves_knight::generate_knight_moves;
use crate::move_generation::legal_moves_pawn::generate_pawn_moves;
use crate::move_generation::legal_moves_queen::generate_queen_moves;
use crate::move_generation::legal_moves_rook::generate_rook_moves;
use crate::moves::move_descriptions::{captured_piece, Move};

/// Moves for the side to move that may leave the own king in check.
pub fn generate_pseudo_legal_moves(game_state: &GameState) -> Vec<Move> {
    let mut moves = Vec::<Move>::with_capacity(64);

    generate_pawn_moves(game_state, &mut moves);
    generate_knight_moves(game_state, &mut moves);
    generate_bishop_moves(game_state, &mut moves);
    generate_rook_moves(game_state, &mut moves);
    generate_queen_moves(game_state, &mut moves);
    generate_king_moves(game_state, &mut moves);

    moves
}

/// Strictly legal moves for the side to move. The state is borrowed mutably
/// for the make/unmake legality filter but is restored before returning.
pub fn generate_legal_moves(game_state: &mut GameState) -> Vec<Move> {
    let pseudo = generate_pseudo_legal_moves(game_state);

    let us = game_state.side_to_move;
    let them = us.opposite();
    let mut legal = Vec::<Move>::with_capacity(pseudo.len());

    for mv in pseudo {
        if captured_piece(mv) == PieceType::King {
            continue;
        }

        make_move_in_place(game_state, mv);
        let keeps_king_safe = match game_state.king_square(us) {
            Some(king_sq) => !is_square_attacked(game_state, king_sq, them),
            None => false,
        };
        unmake_move_in_place(game_state);

        if keeps_king_safe {
            legal.push(mv);
        }
    }

    legal
}
