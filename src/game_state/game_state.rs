//! Core incremental board state representation.
//!
//! `GameState` is the central model for the engine. The square-indexed
//! `board` array is authoritative; piece and occupancy bitboards are caches
//! derived from it and kept in lockstep by the piece-level mutators.

use crate::game_state::chess_rules::STARTING_POSITION_FEN;
use crate::game_state::chess_types::*;
use crate::game_state::undo_state::UndoState;
use crate::search::zobrist::compute_zobrist_key;
use crate::utils::fen_generator::generate_fen;
use crate::utils::fen_parser::parse_fen;

/// Full game state optimized for fast in-place move making/unmaking.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Authoritative square -> piece mapping.
    pub board: [Piece; 64],

    // --- Bitboard caches ---
    // [color][piece_type]; the PieceType::None slot stays empty.
    pub pieces: [[u64; PIECE_TYPE_COUNT]; 2],
    pub occupancy_by_color: [u64; 2],
    pub occupancy_all: u64,

    // --- Side and state flags ---
    pub side_to_move: Color,
    pub castling_rights: CastlingRights,
    pub en_passant_square: Option<Square>,

    // --- Clocks / move counters ---
    pub halfmove_clock: u16,
    pub fullmove_number: u16,

    // --- Hashing ---
    pub zobrist_key: u64,

    // --- Make/unmake stack ---
    pub undo_stack: Vec<UndoState>,
}

impl PartialEq for GameState {
    /// Positional equality; the undo stack is bookkeeping, not position.
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.pieces == other.pieces
            && self.occupancy_by_color == other.occupancy_by_color
            && self.occupancy_all == other.occupancy_all
            && self.side_to_move == other.side_to_move
            && self.castling_rights == other.castling_rights
            && self.en_passant_square == other.en_passant_square
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.zobrist_key == other.zobrist_key
    }
}

impl Eq for GameState {}

impl Default for GameState {
    fn default() -> Self {
        let mut game_state = Self {
            board: [Piece::None; 64],
            pieces: [[0; PIECE_TYPE_COUNT]; 2],
            occupancy_by_color: [0; 2],
            occupancy_all: 0,

            side_to_move: Color::White,
            castling_rights: 0,
            en_passant_square: None,

            halfmove_clock: 0,
            fullmove_number: 1,

            zobrist_key: 0,
            undo_stack: Vec::new(),
        };
        game_state.zobrist_key = compute_zobrist_key(&game_state);
        game_state
    }
}

impl GameState {
    /// Empty board, White to move, no rights, clocks reset.
    #[inline]
    pub fn new_empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn new_game() -> Self {
        match parse_fen(STARTING_POSITION_FEN) {
            Ok(game_state) => game_state,
            Err(err) => panic!("starting FEN should always parse: {err}"),
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<Self, String> {
        parse_fen(fen)
    }

    #[inline]
    pub fn get_fen(&self) -> String {
        generate_fen(self)
    }

    #[inline]
    pub fn piece_on(&self, square: Square) -> Piece {
        self.board[square as usize]
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let kings = self.pieces[color.index()][PieceType::King.index()];
        if kings == 0 {
            None
        } else {
            Some(kings.trailing_zeros() as Square)
        }
    }

    /// Put `piece` on `square`, updating board and bitboard caches.
    ///
    /// The caller refreshes the zobrist key once the whole mutation batch is
    /// done; piece-level mutators leave it untouched.
    pub fn place_piece(&mut self, piece: Piece, square: Square) {
        self.board[square as usize] = piece;
        if piece.is_none() {
            return;
        }
        let bit = 1u64 << square;
        self.pieces[piece.color().index()][piece.piece_type().index()] |= bit;
        self.occupancy_by_color[piece.color().index()] |= bit;
        self.occupancy_all |= bit;
    }

    /// Remove whatever stands on `square`; a no-op for empty squares.
    pub fn remove_piece(&mut self, square: Square) {
        let piece = self.board[square as usize];
        if piece.is_none() {
            return;
        }
        let bit = 1u64 << square;
        self.board[square as usize] = Piece::None;
        self.pieces[piece.color().index()][piece.piece_type().index()] &= !bit;
        self.occupancy_by_color[piece.color().index()] &= !bit;
        self.occupancy_all &= !bit;
    }

    pub fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.board[from as usize];
        self.remove_piece(from);
        self.place_piece(piece, to);
    }

    /// Recompute every bitboard cache and the zobrist key from `board`.
    pub fn rebuild_bitboards(&mut self) {
        self.pieces = [[0; PIECE_TYPE_COUNT]; 2];
        self.occupancy_by_color = [0; 2];
        self.occupancy_all = 0;

        for square in 0..64u8 {
            let piece = self.board[square as usize];
            if piece.is_none() {
                continue;
            }
            let bit = 1u64 << square;
            self.pieces[piece.color().index()][piece.piece_type().index()] |= bit;
            self.occupancy_by_color[piece.color().index()] |= bit;
            self.occupancy_all |= bit;
        }

        self.zobrist_key = compute_zobrist_key(self);
    }
}
