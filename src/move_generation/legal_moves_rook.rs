//! Pseudo-legal rook move generation.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};
use crate::moves::rook_moves::rook_attacks;

pub fn generate_rook_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let own_occupancy = game_state.occupancy_by_color[color.index()];

    let mut rooks = game_state.pieces[color.index()][PieceType::Rook.index()];
    while rooks != 0 {
        let from = rooks.trailing_zeros() as Square;
        rooks &= rooks - 1;

        let mut attacks = rook_attacks(from, game_state.occupancy_all) & !own_occupancy;
        while attacks != 0 {
            let to = attacks.trailing_zeros() as Square;
            attacks &= attacks - 1;

            let capture = game_state.piece_on(to).piece_type();
            moves.push(pack_move(
                from,
                to,
                PieceType::Rook,
                capture,
                PieceType::None,
                MoveFlag::None,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_rook_moves;
    use crate::game_state::game_state::GameState;

    #[test]
    fn open_board_rook_has_fourteen_moves() {
        let game =
            GameState::from_fen("4k3/8/8/8/3R4/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let mut moves = Vec::new();
        generate_rook_moves(&game, &mut moves);
        assert_eq!(moves.len(), 14);
    }
}
