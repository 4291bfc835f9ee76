//! UCI coordinate-move resolution against the legal move list.
//!
//! A move string is accepted only if the current position has a legal move
//! that renders to exactly that string, so malformed and illegal input are
//! both rejected without touching the position.

use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::make_move_in_place;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::{move_to_uci, Move};

/// Resolve `"e2e4"` / `"e7e8q"`-style input to the matching legal move.
pub fn long_algebraic_to_move(game_state: &mut GameState, uci: &str) -> Result<Move, String> {
    if uci.len() != 4 && uci.len() != 5 {
        return Err(format!("Invalid long algebraic move: {uci}"));
    }

    generate_legal_moves(game_state)
        .into_iter()
        .find(|mv| move_to_uci(*mv) == uci)
        .ok_or_else(|| format!("Move is not legal here: {uci}"))
}

/// Apply a UCI move if legal; the position is untouched on `false`.
pub fn apply_long_algebraic(game_state: &mut GameState, uci: &str) -> bool {
    match long_algebraic_to_move(game_state, uci) {
        Ok(mv) => {
            make_move_in_place(game_state, mv);
            true
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_long_algebraic, long_algebraic_to_move};
    use crate::game_state::game_state::GameState;
    use crate::moves::move_descriptions::{move_flag, MoveFlag};

    #[test]
    fn resolves_simple_and_promotion_moves() {
        let mut game = GameState::new_game();
        let push = long_algebraic_to_move(&mut game, "e2e4").expect("e2e4 should resolve");
        assert_eq!(move_flag(push), MoveFlag::DoublePush);

        let mut promo_game =
            GameState::from_fen("7k/P7/8/8/8/8/7p/7K w - - 0 1").expect("FEN should parse");
        let promo =
            long_algebraic_to_move(&mut promo_game, "a7a8n").expect("a7a8n should resolve");
        assert_eq!(move_flag(promo), MoveFlag::Promotion);
    }

    #[test]
    fn resolves_castling_and_en_passant_flags() {
        let mut castle_game =
            GameState::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let castle =
            long_algebraic_to_move(&mut castle_game, "e1g1").expect("e1g1 should resolve");
        assert_eq!(move_flag(castle), MoveFlag::Castle);

        let mut ep_game =
            GameState::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1").expect("FEN should parse");
        let ep = long_algebraic_to_move(&mut ep_game, "e5d6").expect("e5d6 should resolve");
        assert_eq!(move_flag(ep), MoveFlag::EnPassant);
    }

    #[test]
    fn illegal_or_malformed_input_leaves_the_position_unchanged() {
        let mut game = GameState::new_game();
        let before = game.clone();

        assert!(!apply_long_algebraic(&mut game, "e2e5"));
        assert!(!apply_long_algebraic(&mut game, "e7e5"));
        assert!(!apply_long_algebraic(&mut game, "xyzw"));
        assert!(!apply_long_algebraic(&mut game, ""));
        assert!(!apply_long_algebraic(&mut game, "e2e4extra"));
        assert_eq!(game, before);

        assert!(apply_long_algebraic(&mut game, "e2e4"));
        assert_ne!(game, before);
    }

    #[test]
    fn missing_promotion_suffix_is_not_a_legal_pawn_push() {
        let mut game =
            GameState::from_fen("7k/P7/8/8/8/8/7p/7K w - - 0 1").expect("FEN should parse");
        assert!(long_algebraic_to_move(&mut game, "a7a8").is_err());
    }
}
