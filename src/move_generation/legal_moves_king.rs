//! Pseudo-legal king move generation, including castling.
//!
//! Castling is emitted only when the right is set, the king is on its home
//! square, the path is empty, the matching rook sits on its corner, the king
//! is not in check, and neither transit nor landing square is attacked. The
//! move encodes only the king displacement; the rook is repositioned by
//! `make_move_in_place`.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::is_square_attacked;
use crate::moves::king_moves::king_attacks;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};

const E1: Square = 4;
const E8: Square = 60;

pub fn generate_king_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let own_occupancy = game_state.occupancy_by_color[color.index()];
    let Some(king_square) = game_state.king_square(color) else {
        return;
    };

    let mut attacks = king_attacks(king_square) & !own_occupancy;
    while attacks != 0 {
        let to = attacks.trailing_zeros() as Square;
        attacks &= attacks - 1;

        let capture = game_state.piece_on(to).piece_type();
        moves.push(pack_move(
            king_square,
            to,
            PieceType::King,
            capture,
            PieceType::None,
            MoveFlag::None,
        ));
    }

    let home_square = match color {
        Color::White => E1,
        Color::Black => E8,
    };
    if king_square != home_square {
        return;
    }

    let enemy = color.opposite();
    if is_square_attacked(game_state, king_square, enemy) {
        return;
    }

    let (kingside_right, queenside_right, rook_piece) = match color {
        Color::White => (CASTLE_WHITE_KINGSIDE, CASTLE_WHITE_QUEENSIDE, Piece::WhiteRook),
        Color::Black => (CASTLE_BLACK_KINGSIDE, CASTLE_BLACK_QUEENSIDE, Piece::BlackRook),
    };

    if game_state.castling_rights & kingside_right != 0 {
        let f_square = home_square + 1;
        let g_square = home_square + 2;
        let h_square = home_square + 3;
        if game_state.piece_on(f_square).is_none()
            && game_state.piece_on(g_square).is_none()
            && game_state.piece_on(h_square) == rook_piece
            && !is_square_attacked(game_state, f_square, enemy)
            && !is_square_attacked(game_state, g_square, enemy)
        {
            moves.push(pack_move(
                home_square,
                g_square,
                PieceType::King,
                PieceType::None,
                PieceType::None,
                MoveFlag::Castle,
            ));
        }
    }

    if game_state.castling_rights & queenside_right != 0 {
        let d_square = home_square - 1;
        let c_square = home_square - 2;
        let b_square = home_square - 3;
        let a_square = home_square - 4;
        if game_state.piece_on(d_square).is_none()
            && game_state.piece_on(c_square).is_none()
            && game_state.piece_on(b_square).is_none()
            && game_state.piece_on(a_square) == rook_piece
            && !is_square_attacked(game_state, d_square, enemy)
            && !is_square_attacked(game_state, c_square, enemy)
        {
            moves.push(pack_move(
                home_square,
                c_square,
                PieceType::King,
                PieceType::None,
                PieceType::None,
                MoveFlag::Castle,
            ));
        }
    }
}
