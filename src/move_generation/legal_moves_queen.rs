//! Pseudo-legal queen move generation.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};
use crate::moves::queen_moves::queen_attacks;

pub fn generate_queen_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let own_occupancy = game_state.occupancy_by_color[color.index()];

    let mut queens = game_state.pieces[color.index()][PieceType::Queen.index()];
    while queens != 0 {
        let from = queens.trailing_zeros() as Square;
        queens &= queens - 1;

        let mut attacks = queen_attacks(from, game_state.occupancy_all) & !own_occupancy;
        while attacks != 0 {
            let to = attacks.trailing_zeros() as Square;
            attacks &= attacks - 1;

            let capture = game_state.piece_on(to).piece_type();
            moves.push(pack_move(
                from,
                to,
                PieceType::Queen,
                capture,
                PieceType::None,
                MoveFlag::None,
            ));
        }
    }
}
