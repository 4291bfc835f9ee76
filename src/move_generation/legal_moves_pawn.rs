//! Pseudo-legal pawn move generation.
//!
//! Pushes, double pushes, captures, en-passant, and promotions. Any pawn
//! move landing on the last rank emits the four promotion choices instead of
//! a single quiet/capture move.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::{pack_move, Move, MoveFlag};

const PROMOTION_TYPES: [PieceType; 4] = [
    PieceType::Queen,
    PieceType::Rook,
    PieceType::Bishop,
    PieceType::Knight,
];

fn add_promotion_moves(moves: &mut Vec<Move>, from: Square, to: Square, capture: PieceType) {
    for promotion in PROMOTION_TYPES {
        moves.push(pack_move(
            from,
            to,
            PieceType::Pawn,
            capture,
            promotion,
            MoveFlag::Promotion,
        ));
    }
}

pub fn generate_pawn_moves(game_state: &GameState, moves: &mut Vec<Move>) {
    let color = game_state.side_to_move;
    let forward: i32 = if color == Color::White { 1 } else { -1 };
    let start_rank: i32 = if color == Color::White { 1 } else { 6 };
    let promotion_rank: i32 = if color == Color::White { 6 } else { 1 };

    let mut pawns = game_state.pieces[color.index()][PieceType::Pawn.index()];
    while pawns != 0 {
        let from = pawns.trailing_zeros() as Square;
        pawns &= pawns - 1;

        let file = i32::from(square_file(from));
        let rank = i32::from(square_rank(from));
        let next_rank = rank + forward;
        if !(0..8).contains(&next_rank) {
            continue;
        }

        let one_step = make_square(file as u8, next_rank as u8);
        if game_state.occupancy_all & (1u64 << one_step) == 0 {
            if rank == promotion_rank {
                add_promotion_moves(moves, from, one_step, PieceType::None);
            } else {
                moves.push(pack_move(
                    from,
                    one_step,
                    PieceType::Pawn,
                    PieceType::None,
                    PieceType::None,
                    MoveFlag::None,
                ));
                if rank == start_rank {
                    let two_step = make_square(file as u8, (rank + 2 * forward) as u8);
                    if game_state.occupancy_all & (1u64 << two_step) == 0 {
                        moves.push(pack_move(
                            from,
                            two_step,
                            PieceType::Pawn,
                            PieceType::None,
                            PieceType::None,
                            MoveFlag::DoublePush,
                        ));
                    }
                }
            }
        }

        for file_offset in [-1i32, 1] {
            let target_file = file + file_offset;
            if !(0..8).contains(&target_file) {
                continue;
            }
            let target = make_square(target_file as u8, next_rank as u8);
            let target_piece = game_state.piece_on(target);
            if !target_piece.is_none() && target_piece.color() == color.opposite() {
                let capture = target_piece.piece_type();
                if rank == promotion_rank {
                    add_promotion_moves(moves, from, target, capture);
                } else {
                    moves.push(pack_move(
                        from,
                        target,
                        PieceType::Pawn,
                        capture,
                        PieceType::None,
                        MoveFlag::None,
                    ));
                }
            }
            if game_state.en_passant_square == Some(target) {
                moves.push(pack_move(
                    from,
                    target,
                    PieceType::Pawn,
                    PieceType::Pawn,
                    PieceType::None,
                    MoveFlag::EnPassant,
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::generate_pawn_moves;
    use crate::game_state::game_state::GameState;
    use crate::moves::move_descriptions::{move_flag, move_to_uci, Move, MoveFlag};

    fn pawn_moves(fen: &str) -> Vec<Move> {
        let game = GameState::from_fen(fen).expect("FEN should parse");
        let mut moves = Vec::new();
        generate_pawn_moves(&game, &mut moves);
        moves
    }

    #[test]
    fn start_position_pawns_have_sixteen_moves() {
        let moves = pawn_moves("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        assert_eq!(moves.len(), 16);
        assert_eq!(
            moves
                .iter()
                .filter(|m| move_flag(**m) == MoveFlag::DoublePush)
                .count(),
            8
        );
    }

    #[test]
    fn blocked_pawn_cannot_push() {
        let moves = pawn_moves("4k3/8/8/8/4p3/4P3/8/4K3 w - - 0 1");
        assert!(moves.is_empty());
    }

    #[test]
    fn double_push_requires_both_squares_empty() {
        let moves = pawn_moves("4k3/8/8/8/4n3/8/4P3/4K3 w - - 0 1");
        let uci: Vec<String> = moves.iter().map(|m| move_to_uci(*m)).collect();
        assert!(uci.contains(&"e2e3".to_owned()));
        assert!(!uci.contains(&"e2e4".to_owned()));
    }

    #[test]
    fn promotion_square_emits_four_moves() {
        let moves = pawn_moves("7k/P7/8/8/8/8/8/7K w - - 0 1");
        assert_eq!(moves.len(), 4);
        assert!(moves
            .iter()
            .all(|m| move_flag(*m) == MoveFlag::Promotion));
    }

    #[test]
    fn en_passant_target_yields_flagged_capture() {
        let moves = pawn_moves("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1");
        let ep: Vec<&Move> = moves
            .iter()
            .filter(|m| move_flag(**m) == MoveFlag::EnPassant)
            .collect();
        assert_eq!(ep.len(), 1);
        assert_eq!(move_to_uci(*ep[0]), "e5d6");
    }
}
