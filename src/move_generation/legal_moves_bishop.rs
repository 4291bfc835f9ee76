//! Pseudo-legal bishop move generation.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::bishop_moves::bishop_attacks;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};

pub fn generate_bishop_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let own_occupancy = game_state.occupancy_by_color[color.index()];

    let mut bishops = game_state.pieces[color.index()][PieceType::Bishop.index()];
    while bishops != 0 {
        let from = bishops.trailing_zeros() as Square;
        bishops &= bishops - 1;

        let mut attacks = bishop_attacks(from, game_state.occupancy_all) & !own_occupancy;
        while attacks != 0 {
            let to = attacks.trailing_zeros() as Square;
            attacks &= attacks - 1;

            let capture = game_state.piece_on(to).piece_type();
            moves.push(pack_move(
                from,
                to,
                PieceType::Bishop,
                capture,
                PieceType::None,
                MoveFlag::None,
            ));
        }
    }
}
