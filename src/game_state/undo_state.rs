use crate::game_state::chess_types::*;
use crate::moves::move_descriptions::Move;

/// Single undo record for `make_move_in_place` / `unmake_move_in_place`.
#[derive(Debug, Clone, Copy)]
pub struct UndoState {
    pub mv: Move,
    /// Captured piece and the square it stood on (the en-passant victim does
    /// not stand on the move's target square).
    pub captured: Option<(Piece, Square)>,

    pub prev_castling_rights: CastlingRights,
    pub prev_en_passant_square: Option<Square>,
    pub prev_halfmove_clock: u16,
    pub prev_fullmove_number: u16,
    pub prev_side_to_move: Color,
    pub prev_zobrist_key: u64,
}
