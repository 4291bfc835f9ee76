//! Zobrist hashing for position identity.
//!
//! The keys are generated from a fixed seed so hashes are deterministic
//! across runs and platforms, which keeps transposition tables and tests
//! reproducible.

use std::sync::OnceLock;

use crate::game_state::chess_types::*;
use crate::game_state::game_state::GameState;

#[derive(Debug)]
struct ZobristTables {
    // Indexed by Piece; the Piece::None row exists but is never XORed.
    piece_square: [[u64; 64]; PIECE_COUNT],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    side_to_move: u64,
}

static TABLES: OnceLock<ZobristTables> = OnceLock::new();

#[inline]
fn tables() -> &'static ZobristTables {
    TABLES.get_or_init(build_tables)
}

fn build_tables() -> ZobristTables {
    let mut seed: u64 = 0x853C_49E6_748F_EA9B;

    let mut piece_square = [[0u64; 64]; PIECE_COUNT];
    for piece in &mut piece_square {
        for sq in piece.iter_mut() {
            *sq = next_random_u64(&mut seed);
        }
    }

    let mut castling = [0u64; 16];
    for key in &mut castling {
        *key = next_random_u64(&mut seed);
    }

    let mut en_passant_file = [0u64; 8];
    for key in &mut en_passant_file {
        *key = next_random_u64(&mut seed);
    }

    let side_to_move = next_random_u64(&mut seed);

    ZobristTables {
        piece_square,
        castling,
        en_passant_file,
        side_to_move,
    }
}

#[inline]
fn next_random_u64(state: &mut u64) -> u64 {
    // splitmix64
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Key for a `(piece, square)` occupancy term.
#[inline]
pub fn piece_square_key(piece: Piece, square: Square) -> u64 {
    tables().piece_square[piece.index()][square as usize]
}

/// Key contribution of the full 4-bit castling rights mask.
#[inline]
pub fn castling_key(castling_rights: CastlingRights) -> u64 {
    tables().castling[(castling_rights & 0x0F) as usize]
}

/// Key contribution of a set en-passant file.
#[inline]
pub fn en_passant_file_key(file: u8) -> u64 {
    tables().en_passant_file[file as usize]
}

/// Side-to-move toggle key (XORed in when Black is to move).
#[inline]
pub fn side_to_move_key() -> u64 {
    tables().side_to_move
}

/// Full position key from scratch; the reference for the incremental field.
pub fn compute_zobrist_key(game_state: &GameState) -> u64 {
    let mut key = 0u64;

    for square in 0..64u8 {
        let piece = game_state.board[square as usize];
        if piece.is_none() {
            continue;
        }
        key ^= piece_square_key(piece, square);
    }

    key ^= castling_key(game_state.castling_rights);

    if let Some(ep_square) = game_state.en_passant_square {
        key ^= en_passant_file_key(square_file(ep_square));
    }

    if game_state.side_to_move == Color::Black {
        key ^= side_to_move_key();
    }

    key
}
