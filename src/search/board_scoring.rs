//! Pluggable board evaluation.
//!
//! Search delegates static scoring to the `BoardScorer` trait so heuristics
//! can be swapped without touching search code. `StandardScorer` is the
//! engine default: material plus piece-square tables with a central
//! attraction bias. Scores are centipawns from the side to move.

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

pub trait BoardScorer: Send + Sync {
    /// Score from the perspective of the side to move.
    fn score(&self, game_state: &GameState) -> i32;
}

/// Material values in centipawns, indexed by `PieceType`. Kings carry no
/// material; mate handling lives in search.
pub const PIECE_VALUES: [i32; PIECE_TYPE_COUNT] = [0, 100, 320, 330, 500, 900, 0];

const CENTER_FILE: [i32; 8] = [0, 1, 2, 3, 3, 2, 1, 0];
const CENTER_RANK: [i32; 8] = [0, 1, 2, 3, 3, 2, 1, 0];
const PAWN_RANK: [i32; 8] = [0, 4, 8, 12, 16, 20, 24, 0];
const ROOK_RANK: [i32; 8] = [0, 1, 2, 2, 3, 4, 6, 0];

static PAWN_PST: [i32; 64] = make_pst(PieceType::Pawn);
static KNIGHT_PST: [i32; 64] = make_pst(PieceType::Knight);
static BISHOP_PST: [i32; 64] = make_pst(PieceType::Bishop);
static ROOK_PST: [i32; 64] = make_pst(PieceType::Rook);
static QUEEN_PST: [i32; 64] = make_pst(PieceType::Queen);
static KING_PST: [i32; 64] = make_pst(PieceType::King);

const fn pst_value(piece_type: PieceType, file: usize, rank: usize) -> i32 {
    match piece_type {
        PieceType::Pawn => PAWN_RANK[rank] + CENTER_FILE[file],
        PieceType::Knight => (CENTER_FILE[file] + CENTER_RANK[rank]) * 4,
        PieceType::Bishop => (CENTER_FILE[file] + CENTER_RANK[rank]) * 3,
        PieceType::Rook => ROOK_RANK[rank] + CENTER_FILE[file],
        PieceType::Queen => (CENTER_FILE[file] + CENTER_RANK[rank]) * 2,
        PieceType::King => -(CENTER_FILE[file] + CENTER_RANK[rank]) * 5,
        PieceType::None => 0,
    }
}

const fn make_pst(piece_type: PieceType) -> [i32; 64] {
    let mut table = [0i32; 64];
    let mut rank = 0usize;
    while rank < 8 {
        let mut file = 0usize;
        while file < 8 {
            table[rank * 8 + file] = pst_value(piece_type, file, rank);
            file += 1;
        }
        rank += 1;
    }
    table
}

#[inline]
fn pst_for(piece_type: PieceType) -> &'static [i32; 64] {
    match piece_type {
        PieceType::Knight => &KNIGHT_PST,
        PieceType::Bishop => &BISHOP_PST,
        PieceType::Rook => &ROOK_PST,
        PieceType::Queen => &QUEEN_PST,
        PieceType::King => &KING_PST,
        _ => &PAWN_PST,
    }
}

/// White tables apply to Black through a vertical mirror.
#[inline]
const fn mirror_square(square: Square) -> Square {
    make_square(square_file(square), 7 - square_rank(square))
}

/// Material-only scorer, kept as the baseline for tests and comparisons.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialScorer;

impl BoardScorer for MaterialScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let mut white_minus_black = 0i32;
        for type_index in PieceType::Pawn.index()..=PieceType::King.index() {
            let value = PIECE_VALUES[type_index];
            let white = game_state.pieces[Color::White.index()][type_index].count_ones() as i32;
            let black = game_state.pieces[Color::Black.index()][type_index].count_ones() as i32;
            white_minus_black += (white - black) * value;
        }
        match game_state.side_to_move {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }
}

/// Material plus piece-square tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardScorer;

impl BoardScorer for StandardScorer {
    fn score(&self, game_state: &GameState) -> i32 {
        let mut white_minus_black = 0i32;

        for color in [Color::White, Color::Black] {
            let sign = if color == Color::White { 1 } else { -1 };
            for type_index in PieceType::Pawn.index()..=PieceType::King.index() {
                let piece_type = PieceType::from_index(type_index);
                let pst = pst_for(piece_type);
                let mut bb = game_state.pieces[color.index()][type_index];
                while bb != 0 {
                    let mut sq = bb.trailing_zeros() as Square;
                    bb &= bb - 1;
                    if color == Color::Black {
                        sq = mirror_square(sq);
                    }
                    white_minus_black +=
                        sign * (PIECE_VALUES[type_index] + pst[sq as usize]);
                }
            }
        }

        match game_state.side_to_move {
            Color::White => white_minus_black,
            Color::Black => -white_minus_black,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BoardScorer, MaterialScorer, StandardScorer};
    use crate::game_state::game_state::GameState;

    #[test]
    fn material_scorer_reflects_side_to_move_perspective() {
        let white_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 w - - 0 1").expect("FEN should parse");
        let black_to_move =
            GameState::from_fen("4k3/8/8/8/8/8/8/4KQ2 b - - 0 1").expect("FEN should parse");

        let scorer = MaterialScorer;
        assert_eq!(scorer.score(&white_to_move), 900);
        assert_eq!(scorer.score(&black_to_move), -900);
    }

    #[test]
    fn start_position_is_balanced() {
        let game = GameState::new_game();
        assert_eq!(MaterialScorer.score(&game), 0);
        assert_eq!(StandardScorer.score(&game), 0);
    }

    #[test]
    fn standard_scorer_rewards_central_knight() {
        let center =
            GameState::from_fen("4k3/8/8/3N4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let rim =
            GameState::from_fen("4k3/8/8/8/8/8/N7/4K3 w - - 0 1").expect("FEN should parse");
        let scorer = StandardScorer;
        assert!(
            scorer.score(&center) > scorer.score(&rim),
            "central knight should score better"
        );
    }

    #[test]
    fn standard_scorer_rewards_pawn_advancement() {
        let advanced =
            GameState::from_fen("4k3/8/4P3/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let home =
            GameState::from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(StandardScorer.score(&advanced) > StandardScorer.score(&home));
    }

    #[test]
    fn black_pieces_use_the_mirrored_tables() {
        // Symmetric position: mirrored placements must cancel exactly.
        let game = GameState::from_fen("4k3/3p4/8/8/8/8/3P4/4K3 w - - 0 1")
            .expect("FEN should parse");
        assert_eq!(StandardScorer.score(&game), 0);
    }

    #[test]
    fn king_prefers_the_edge() {
        let center =
            GameState::from_fen("4k3/8/8/8/3K4/8/8/8 w - - 0 1").expect("FEN should parse");
        let edge =
            GameState::from_fen("4k3/8/8/8/8/8/8/3K4 w - - 0 1").expect("FEN should parse");
        assert!(StandardScorer.score(&edge) > StandardScorer.score(&center));
    }
}
