//! Pseudo-legal knight move generation.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::knight_moves::knight_attacks;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};

pub fn generate_knight_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let own_occupancy = game_state.occupancy_by_color[color.index()];

    let mut knights = game_state.pieces[color.index()][PieceType::Knight.index()];
    while knights != 0 {
        let from = knights.trailing_zeros() as Square;
        knights &= knights - 1;

        let mut attacks = knight_attacks(from) & !own_occupancy;
        while attacks != 0 {
            let to = attacks.trailing_zeros() as Square;
            attacks &= attacks - 1;

            let capture = game_state.piece_on(to).piece_type();
            moves.push(pack_move(
                from,
                to,
                PieceType::Knight,
                capture,
                PieceType::None,
                MoveFlag::None,
            ));
        }
    }
}
