//! Attack and check predicates used by generation, search, and the glue API.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::king_moves::king_attacks;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::pawn_moves::pawn_attacks;
use crate::moves::rook_moves::rook_attacks;

#[inline]
pub fn is_king_in_check(game_state: &GameState, color: Color) -> bool {
    let Some(king_sq) = game_state.king_square(color) else {
        return false;
    };
    is_square_attacked(game_state, king_sq, color.opposite())
}

/// True when the side to move stands in check.
#[inline]
pub fn in_check(game_state: &GameState) -> bool {
    is_king_in_check(game_state, game_state.side_to_move)
}

/// Would any `attacker_color` piece capture on `square`?
///
/// The pawn test exploits attack symmetry: the pawns that attack `square`
/// are exactly the pawns a defender-colored pawn on `square` would attack.
pub fn is_square_attacked(game_state: &GameState, square: Square, attacker_color: Color) -> bool {
    let attacker = attacker_color.index();
    let occupancy = game_state.occupancy_all;

    let pawns = game_state.pieces[attacker][PieceType::Pawn.index()];
    if pawn_attacks(attacker_color.opposite(), square) & pawns != 0 {
        return true;
    }

    let knights = game_state.pieces[attacker][PieceType::Knight.index()];
    if knight_attacks(square) & knights != 0 {
        return true;
    }

    let kings = game_state.pieces[attacker][PieceType::King.index()];
    if king_attacks(square) & kings != 0 {
        return true;
    }

    let queens = game_state.pieces[attacker][PieceType::Queen.index()];
    let bishops = game_state.pieces[attacker][PieceType::Bishop.index()];
    if bishop_attacks(square, occupancy) & (bishops | queens) != 0 {
        return true;
    }

    let rooks = game_state.pieces[attacker][PieceType::Rook.index()];
    if rook_attacks(square, occupancy) & (rooks | queens) != 0 {
        return true;
    }

    false
}
