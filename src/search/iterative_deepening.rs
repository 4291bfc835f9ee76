//! Iterative deepening search with negamax alpha-beta pruning.
//!
//! Heuristics:
//! - Quiescence search with in-check evasion at the horizon.
//! - Null-move pruning with a depth-scaled reduction and zugzwang guard.
//! - Transposition-table probing with exact/lower/upper bound handling and
//!   mate-distance normalization.
//! - Killer and history ordering for quiet moves, MVV/LVA for captures.
//! - Root parallelism: workers pull root moves from a shared atomic index,
//!   each on its own copy of the position, best result under a mutex.
//! - Cooperative cancellation: a shared stop flag sampled every 4096 nodes
//!   against the monotonic deadline.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crate::game_state::chess_types::{PieceType, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{make_move_in_place, unmake_move_in_place};
use crate::move_generation::legal_move_checks::in_check;
use crate::move_generation::legal_move_generator::generate_legal_moves;
use crate::moves::move_descriptions::{
    captured_piece, is_tactical_move, move_from, move_to, moved_piece, promotion_piece, Move,
};
use crate::search::board_scoring::BoardScorer;
use crate::search::transposition_table::{Bound, TranspositionTable};
use crate::search::zobrist::compute_zobrist_key;

pub const MATE_SCORE: i32 = 30_000;
pub const MATE_THRESHOLD: i32 = 29_000;
const INFINITY_SCORE: i32 = 32_000;
const MAX_PLY: usize = 64;
const HISTORY_MAX: i32 = 1_000_000;

/// Ordering values per piece type; the king entry only matters for MVV/LVA
/// aggressor costs.
const MOVE_VALUES: [i32; 7] = [0, 100, 320, 330, 500, 900, 20_000];

#[derive(Debug, Clone, Default)]
pub struct SearchLimits {
    /// Depth cap; 0 leaves depth bounded only by the ply stack.
    pub max_depth: u8,
    /// Wall-clock budget; the deadline is sampled at node granularity.
    pub movetime_ms: Option<u64>,
    /// Ignore the depth cap; the caller must provide a time or stop flag.
    pub infinite: bool,
    /// Externally shared stop flag. Setting it twice is harmless.
    pub stop_flag: Option<Arc<AtomicBool>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub best_score: i32,
    pub reached_depth: u8,
    pub nodes: u64,
    pub elapsed_ms: u64,
    pub nps: u64,
}

/// Per-thread search state; never shared.
struct SearchContext<'a> {
    nodes: u64,
    killers: [[Move; 2]; MAX_PLY],
    history: Box<[[i32; 64]; 64]>,
    stop: &'a AtomicBool,
    deadline: Option<Instant>,
}

impl<'a> SearchContext<'a> {
    fn new(stop: &'a AtomicBool, deadline: Option<Instant>) -> Self {
        Self {
            nodes: 0,
            killers: [[0; 2]; MAX_PLY],
            history: Box::new([[0; 64]; 64]),
            stop,
            deadline,
        }
    }
}

/// Search the position under `limits` using up to `threads` workers.
///
/// Returns `best_move: None` only when the root has no legal moves (the
/// score then distinguishes mate from stalemate).
pub fn search<S: BoardScorer>(
    game_state: &GameState,
    scorer: &S,
    limits: SearchLimits,
    tt: &TranspositionTable,
    threads: usize,
) -> SearchResult {
    let started_at = Instant::now();
    let stop = limits
        .stop_flag
        .clone()
        .unwrap_or_else(|| Arc::new(AtomicBool::new(false)));
    let deadline = limits
        .movetime_ms
        .map(|ms| started_at + Duration::from_millis(ms.max(1)));
    let max_depth = if limits.infinite {
        u8::MAX
    } else if limits.max_depth > 0 {
        limits.max_depth
    } else {
        MAX_PLY as u8
    };
    let threads = threads.max(1);

    let mut root_state = game_state.clone();
    let mut best: Option<(Option<Move>, i32, u8)> = None;
    let mut total_nodes = 0u64;

    for depth in 1..=max_depth {
        if let Some(limit) = deadline {
            if Instant::now() >= limit {
                break;
            }
        }

        let (best_move, best_score, nodes) =
            search_root(&mut root_state, scorer, depth, threads, tt, &stop, deadline);
        total_nodes = total_nodes.saturating_add(nodes);

        if stop.load(Ordering::Relaxed) {
            // A cancelled iteration only counts when nothing finished yet.
            if best.is_none() {
                best = Some((best_move, best_score, depth));
            }
            break;
        }
        best = Some((best_move, best_score, depth));

        if best_move.is_none() {
            // No legal moves; deeper iterations cannot change the verdict.
            break;
        }
    }

    let (best_move, best_score, reached_depth) = best.unwrap_or((None, 0, 0));
    let elapsed_ms = started_at.elapsed().as_millis() as u64;
    SearchResult {
        best_move,
        best_score,
        reached_depth,
        nodes: total_nodes,
        elapsed_ms,
        nps: if elapsed_ms == 0 {
            0
        } else {
            total_nodes.saturating_mul(1000) / elapsed_ms
        },
    }
}

fn search_root<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    depth: u8,
    threads: usize,
    tt: &TranspositionTable,
    stop: &AtomicBool,
    deadline: Option<Instant>,
) -> (Option<Move>, i32, u64) {
    let mut moves = generate_legal_moves(game_state);
    if moves.is_empty() {
        let score = if in_check(game_state) { -MATE_SCORE } else { 0 };
        return (None, score, 0);
    }

    let root_key = game_state.zobrist_key;
    let tt_move = tt.probe(root_key).and_then(|entry| entry.best_move);
    order_moves(&mut moves, tt_move, None, 0);

    let mut best_move = None;
    let mut best_score = -INFINITY_SCORE;
    let total_nodes;

    if threads <= 1 || moves.len() < 2 {
        let mut context = SearchContext::new(stop, deadline);
        let mut alpha = -INFINITY_SCORE;
        let beta = INFINITY_SCORE;

        for mv in moves {
            if stop.load(Ordering::Relaxed) {
                break;
            }
            make_move_in_place(game_state, mv);
            let score = -negamax(game_state, scorer, depth - 1, -beta, -alpha, 1, &mut context, tt);
            unmake_move_in_place(game_state);
            if stop.load(Ordering::Relaxed) {
                break;
            }

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            alpha = alpha.max(score);
            if alpha >= beta {
                break;
            }
        }
        total_nodes = context.nodes;
    } else {
        let root_copy = game_state.clone();
        let next_index = AtomicUsize::new(0);
        let shared_best = Mutex::new((-INFINITY_SCORE, None::<Move>));
        let shared_nodes = AtomicU64::new(0);
        let moves_ref = &moves;

        thread::scope(|scope| {
            for _ in 0..threads {
                let root_copy = &root_copy;
                let next_index = &next_index;
                let shared_best = &shared_best;
                let shared_nodes = &shared_nodes;
                scope.spawn(move || {
                    let mut local = root_copy.clone();
                    let mut context = SearchContext::new(stop, deadline);
                    loop {
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }
                        let index = next_index.fetch_add(1, Ordering::Relaxed);
                        if index >= moves_ref.len() {
                            break;
                        }
                        let mv = moves_ref[index];
                        make_move_in_place(&mut local, mv);
                        let score = -negamax(
                            &mut local,
                            scorer,
                            depth - 1,
                            -INFINITY_SCORE,
                            INFINITY_SCORE,
                            1,
                            &mut context,
                            tt,
                        );
                        unmake_move_in_place(&mut local);
                        if stop.load(Ordering::Relaxed) {
                            break;
                        }

                        // A panicking worker must not take the others down
                        // with it through lock poisoning; the tuple is
                        // always written whole, so the guard stays usable.
                        let mut guard = shared_best
                            .lock()
                            .unwrap_or_else(|poison| poison.into_inner());
                        if score > guard.0 {
                            *guard = (score, Some(mv));
                        }
                    }
                    shared_nodes.fetch_add(context.nodes, Ordering::Relaxed);
                });
            }
        });

        let (score, mv) = *shared_best
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());
        best_score = score;
        best_move = mv;
        total_nodes = shared_nodes.load(Ordering::Relaxed);
    }

    tt.store(
        root_key,
        depth,
        tt_score_for_storage(best_score, 0),
        Bound::Exact,
        best_move,
    );
    (best_move, best_score, total_nodes)
}

#[allow(clippy::too_many_arguments)]
fn negamax<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    depth: u8,
    mut alpha: i32,
    mut beta: i32,
    ply: u8,
    context: &mut SearchContext,
    tt: &TranspositionTable,
) -> i32 {
    if depth == 0 {
        return quiescence(game_state, scorer, alpha, beta, ply, context);
    }

    context.nodes += 1;
    if should_stop(context) {
        return scorer.score(game_state);
    }

    let alpha_orig = alpha;
    let beta_orig = beta;
    let key = game_state.zobrist_key;
    let mut tt_move = None;

    if let Some(entry) = tt.probe(key) {
        tt_move = entry.best_move;
        if entry.depth >= depth {
            let tt_score = tt_score_from_storage(entry.score, ply);
            match entry.bound {
                Bound::Exact => return tt_score,
                Bound::Lower => alpha = alpha.max(tt_score),
                Bound::Upper => beta = beta.min(tt_score),
            }
            if alpha >= beta {
                return tt_score;
            }
        }
    }

    let in_check_now = in_check(game_state);

    if !in_check_now && depth >= 3 && has_non_pawn_material(game_state) {
        let reduction = if depth >= 6 { 3 } else { 2 };
        let null = make_null_move(game_state);
        let score = -negamax(
            game_state,
            scorer,
            depth.saturating_sub(1 + reduction),
            -beta,
            -beta + 1,
            ply.saturating_add(1),
            context,
            tt,
        );
        unmake_null_move(game_state, null);
        if score >= beta {
            return score;
        }
    }

    let mut moves = generate_legal_moves(game_state);
    if moves.is_empty() {
        return if in_check_now {
            -MATE_SCORE + i32::from(ply)
        } else {
            0
        };
    }

    order_moves(&mut moves, tt_move, Some(&*context), ply);

    let mut best_move = None;
    let mut best_score = -INFINITY_SCORE;

    for mv in moves {
        make_move_in_place(game_state, mv);
        let score = -negamax(
            game_state,
            scorer,
            depth - 1,
            -beta,
            -alpha,
            ply.saturating_add(1),
            context,
            tt,
        );
        unmake_move_in_place(game_state);

        if score > best_score {
            best_score = score;
            best_move = Some(mv);
        }
        alpha = alpha.max(score);
        if alpha >= beta {
            update_quiet_heuristics(context, mv, depth, ply);
            break;
        }
    }

    let bound = if best_score <= alpha_orig {
        Bound::Upper
    } else if best_score >= beta_orig {
        Bound::Lower
    } else {
        Bound::Exact
    };
    tt.store(key, depth, tt_score_for_storage(best_score, ply), bound, best_move);

    best_score
}

fn quiescence<S: BoardScorer>(
    game_state: &mut GameState,
    scorer: &S,
    mut alpha: i32,
    beta: i32,
    ply: u8,
    context: &mut SearchContext,
) -> i32 {
    context.nodes += 1;
    if should_stop(context) {
        return scorer.score(game_state);
    }

    let in_check_now = in_check(game_state);

    let mut stand_pat = -INFINITY_SCORE;
    if !in_check_now {
        stand_pat = scorer.score(game_state);
        if stand_pat >= beta {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
    }

    let mut moves = generate_legal_moves(game_state);
    if moves.is_empty() {
        return if in_check_now {
            -MATE_SCORE + i32::from(ply)
        } else {
            0
        };
    }

    if !in_check_now {
        moves.retain(|mv| is_tactical_move(*mv));
        if moves.is_empty() {
            return stand_pat;
        }
    }

    order_moves(&mut moves, None, Some(&*context), ply);

    for mv in moves {
        make_move_in_place(game_state, mv);
        let score = -quiescence(
            game_state,
            scorer,
            -beta,
            -alpha,
            ply.saturating_add(1),
            context,
        );
        unmake_move_in_place(game_state);

        if score >= beta {
            return score;
        }
        if score > alpha {
            alpha = score;
        }
    }

    alpha
}

/// Sample the deadline every 4096 nodes; once it fires, latch the shared
/// stop flag so every worker winds down.
#[inline]
fn should_stop(context: &mut SearchContext) -> bool {
    if context.stop.load(Ordering::Relaxed) {
        return true;
    }
    if context.nodes & 4095 != 0 {
        return false;
    }
    let Some(deadline) = context.deadline else {
        return false;
    };
    if Instant::now() < deadline {
        return false;
    }
    context.stop.store(true, Ordering::Relaxed);
    true
}

#[inline]
fn has_non_pawn_material(game_state: &GameState) -> bool {
    let us = game_state.side_to_move.index();
    game_state.pieces[us][PieceType::Knight.index()] != 0
        || game_state.pieces[us][PieceType::Bishop.index()] != 0
        || game_state.pieces[us][PieceType::Rook.index()] != 0
        || game_state.pieces[us][PieceType::Queen.index()] != 0
}

#[derive(Debug, Clone, Copy)]
struct NullMoveUndo {
    prev_en_passant_square: Option<Square>,
    prev_zobrist_key: u64,
}

fn make_null_move(game_state: &mut GameState) -> NullMoveUndo {
    let undo = NullMoveUndo {
        prev_en_passant_square: game_state.en_passant_square,
        prev_zobrist_key: game_state.zobrist_key,
    };
    game_state.en_passant_square = None;
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.zobrist_key = compute_zobrist_key(game_state);
    undo
}

fn unmake_null_move(game_state: &mut GameState, undo: NullMoveUndo) {
    game_state.side_to_move = game_state.side_to_move.opposite();
    game_state.en_passant_square = undo.prev_en_passant_square;
    game_state.zobrist_key = undo.prev_zobrist_key;
}

/// Mate scores enter the table relative to the stored node so they stay
/// valid across transpositions at different root distances.
#[inline]
fn tt_score_for_storage(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score + i32::from(ply)
    } else if score < -MATE_THRESHOLD {
        score - i32::from(ply)
    } else {
        score
    }
}

#[inline]
fn tt_score_from_storage(score: i32, ply: u8) -> i32 {
    if score > MATE_THRESHOLD {
        score - i32::from(ply)
    } else if score < -MATE_THRESHOLD {
        score + i32::from(ply)
    } else {
        score
    }
}

fn order_moves(moves: &mut [Move], tt_move: Option<Move>, context: Option<&SearchContext>, ply: u8) {
    if moves.len() < 2 {
        return;
    }
    moves.sort_unstable_by_key(|mv| -move_order_score(*mv, tt_move, context, ply));
}

fn move_order_score(mv: Move, tt_move: Option<Move>, context: Option<&SearchContext>, ply: u8) -> i32 {
    if Some(mv) == tt_move {
        return 1_000_000;
    }

    let mut score = 0i32;
    let captured = captured_piece(mv);
    if !captured.is_none() {
        score += 5_000 + MOVE_VALUES[captured.index()] * 10
            - MOVE_VALUES[moved_piece(mv).index()];
    }
    if !promotion_piece(mv).is_none() {
        score += 8_000 + MOVE_VALUES[promotion_piece(mv).index()];
    }

    if let Some(context) = context {
        if !is_tactical_move(mv) {
            let ply_index = usize::from(ply).min(MAX_PLY - 1);
            let killers = context.killers[ply_index];
            if mv == killers[0] {
                score += 7_000;
            } else if mv == killers[1] {
                score += 6_000;
            }
            score += context.history[move_from(mv) as usize][move_to(mv) as usize];
        }
    }

    score
}

fn update_quiet_heuristics(context: &mut SearchContext, mv: Move, depth: u8, ply: u8) {
    if is_tactical_move(mv) {
        return;
    }
    let ply_index = usize::from(ply).min(MAX_PLY - 1);
    let killers = &mut context.killers[ply_index];
    if killers[0] != mv {
        killers[1] = killers[0];
        killers[0] = mv;
    }
    let bonus = i32::from(depth) * i32::from(depth);
    let entry = &mut context.history[move_from(mv) as usize][move_to(mv) as usize];
    *entry = (*entry + bonus).min(HISTORY_MAX);
}

#[cfg(test)]
mod tests {
    use super::{
        search, tt_score_for_storage, tt_score_from_storage, SearchLimits, MATE_SCORE,
        MATE_THRESHOLD,
    };
    use crate::game_state::game_state::GameState;
    use crate::move_generation::legal_move_apply::make_move_in_place;
    use crate::move_generation::legal_move_generator::generate_legal_moves;
    use crate::moves::move_descriptions::move_to_uci;
    use crate::search::board_scoring::{MaterialScorer, StandardScorer};
    use crate::search::transposition_table::TranspositionTable;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    fn depth_limits(depth: u8) -> SearchLimits {
        SearchLimits {
            max_depth: depth,
            ..SearchLimits::default()
        }
    }

    #[test]
    fn search_prefers_winning_capture_in_simple_position() {
        let game =
            GameState::from_fen("4k3/8/8/8/8/8/4q3/4KQ2 w - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &MaterialScorer, depth_limits(1), &tt, 1);
        let best_move = result.best_move.expect("best move should exist");
        assert_eq!(move_to_uci(best_move), "f1e2");
        assert_eq!(result.reached_depth, 1);
    }

    #[test]
    fn search_finds_mate_in_one() {
        let game =
            GameState::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &StandardScorer, depth_limits(2), &tt, 1);
        let best_move = result.best_move.expect("best move should exist");
        assert!(
            result.best_score > MATE_THRESHOLD,
            "mate score should dominate material, got {}",
            result.best_score
        );

        let mut next = game.clone();
        make_move_in_place(&mut next, best_move);
        assert!(generate_legal_moves(&mut next).is_empty());
    }

    #[test]
    fn mated_root_returns_no_move_and_mate_score() {
        let game =
            GameState::from_fen("6k1/6Q1/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &StandardScorer, depth_limits(3), &tt, 1);
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, -MATE_SCORE);
    }

    #[test]
    fn stalemate_root_returns_no_move_and_draw_score() {
        let game =
            GameState::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &StandardScorer, depth_limits(3), &tt, 1);
        assert_eq!(result.best_move, None);
        assert_eq!(result.best_score, 0);
    }

    #[test]
    fn single_threaded_search_is_deterministic_with_a_cleared_table() {
        let game = GameState::from_fen(
            "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1",
        )
        .expect("FEN should parse");

        let tt_a = TranspositionTable::new();
        let a = search(&game, &StandardScorer, depth_limits(3), &tt_a, 1);
        let tt_b = TranspositionTable::new();
        let b = search(&game, &StandardScorer, depth_limits(3), &tt_b, 1);

        assert_eq!(a.best_move, b.best_move);
        assert_eq!(a.best_score, b.best_score);
        assert_eq!(a.nodes, b.nodes);
    }

    #[test]
    fn multithreaded_search_returns_a_legal_move_and_the_forced_score() {
        let game =
            GameState::from_fen("6k1/5Q2/6K1/8/8/8/8/8 w - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &StandardScorer, depth_limits(2), &tt, 4);
        let best_move = result.best_move.expect("best move should exist");
        assert!(result.best_score > MATE_THRESHOLD);

        let mut root = game.clone();
        let legal = generate_legal_moves(&mut root);
        assert!(legal.contains(&best_move));
    }

    #[test]
    fn time_limited_search_terminates_and_reports_a_result() {
        let game = GameState::new_game();
        let tt = TranspositionTable::new();
        let limits = SearchLimits {
            max_depth: 63,
            movetime_ms: Some(50),
            ..SearchLimits::default()
        };

        let result = search(&game, &StandardScorer, limits, &tt, 1);
        assert!(result.best_move.is_some());
        assert!(result.reached_depth >= 1);
    }

    #[test]
    fn external_stop_flag_cancels_an_infinite_search() {
        let game = GameState::new_game();
        let tt = TranspositionTable::new();
        let stop = Arc::new(AtomicBool::new(false));
        let limits = SearchLimits {
            infinite: true,
            stop_flag: Some(Arc::clone(&stop)),
            ..SearchLimits::default()
        };

        let setter = Arc::clone(&stop);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(30));
            setter.store(true, Ordering::Relaxed);
            // Idempotent by design.
            setter.store(true, Ordering::Relaxed);
        });

        let result = search(&game, &StandardScorer, limits, &tt, 2);
        handle.join().expect("setter thread should finish");
        assert!(result.best_move.is_some());
    }

    #[test]
    fn null_move_is_its_own_inverse() {
        let game = GameState::from_fen("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1")
            .expect("FEN should parse");
        let mut state = game.clone();

        let undo = super::make_null_move(&mut state);
        assert_ne!(state.side_to_move, game.side_to_move);
        assert_ne!(state.zobrist_key, game.zobrist_key);

        super::unmake_null_move(&mut state, undo);
        assert_eq!(state, game);
    }

    #[test]
    fn mate_scores_round_trip_through_tt_normalization() {
        let ply = 7u8;
        let mate_win = MATE_SCORE - 12;
        let mate_loss = -MATE_SCORE + 9;

        assert_eq!(
            tt_score_from_storage(tt_score_for_storage(mate_win, ply), ply),
            mate_win
        );
        assert_eq!(
            tt_score_from_storage(tt_score_for_storage(mate_loss, ply), ply),
            mate_loss
        );
        assert_eq!(tt_score_for_storage(150, ply), 150);
    }

    #[test]
    fn deeper_search_finds_a_mate_in_two() {
        // 1.Kg6 boxes the king, 2.Rb8# follows whatever Black plays.
        let game =
            GameState::from_fen("7k/8/5K2/8/8/8/8/1R6 w - - 0 1").expect("FEN should parse");
        let tt = TranspositionTable::new();

        let result = search(&game, &StandardScorer, depth_limits(4), &tt, 1);
        assert!(
            result.best_score > MATE_THRESHOLD,
            "expected forced mate, got {}",
            result.best_score
        );
    }
}
