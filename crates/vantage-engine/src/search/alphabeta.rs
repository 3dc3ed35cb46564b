//! Alpha-beta search with quiescence.
//!
//! The board lives in the [`SearchContext`] and is mutated in place: every
//! `make_move` is paired with an `unmake_move` before the frame returns, so
//! exactly one line from the root is on the board at any time.

use vantage_core::{Board, Move, MoveList, RepetitionTable, generate_captures, generate_moves, legal_moves};

use crate::eval::evaluate;
use crate::search::control::SearchControl;
use crate::search::heuristics::{HistoryTable, KillerTable};
use crate::search::ordering::MovePicker;
use crate::search::stats::SearchStats;
use crate::search::tt::{Bound, TranspositionTable};

/// Score of being checkmated at the root, before ply adjustment.
pub const MATE: i32 = 100_000;

/// Wider than any reachable score.
pub const INF: i32 = 200_000;

/// Maximum search depth (in plies) for array sizing and recursion limits.
pub const MAX_PLY: usize = 128;

/// Scores at or beyond this magnitude encode a forced mate.
pub const MATE_THRESHOLD: i32 = MATE - MAX_PLY as i32;

const NULL_MOVE_REDUCTION: u8 = 2;
const NULL_MOVE_MIN_DEPTH: u8 = 3;

const LMR_MIN_MOVE_INDEX: usize = 4;
const LMR_MIN_DEPTH: u8 = 3;

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// Full moves until mate: positive when the side to move mates, negative
/// when it is mated. `None` for ordinary scores.
pub fn mate_distance(score: i32) -> Option<i32> {
    if !is_mate_score(score) {
        None
    } else if score > 0 {
        Some((MATE - score + 1) / 2)
    } else {
        Some(-(MATE + score) / 2)
    }
}

/// Selective-search switches. Both are on in normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Pruning {
    pub null_move: bool,
    pub late_move_reductions: bool,
}

impl Default for Pruning {
    fn default() -> Self {
        Self { null_move: true, late_move_reductions: true }
    }
}

/// Whether a null move may be tried at this node.
///
/// Never at the root, at PV nodes, in check, near the horizon, or when the
/// mover has only pawns left (zugzwang).
fn null_move_allowed(board: &Board, depth: u8, ply: usize, is_pv: bool, in_check: bool) -> bool {
    ply > 0
        && !is_pv
        && !in_check
        && depth >= NULL_MOVE_MIN_DEPTH
        && board.has_non_pawn_material(board.side_to_move())
}

/// Plies taken off a late quiet move searched with a null window.
fn late_move_reduction(searched: usize, depth: u8, in_check: bool, mv: Move) -> u8 {
    u8::from(searched >= LMR_MIN_MOVE_INDEX && depth >= LMR_MIN_DEPTH && !in_check && mv.is_quiet())
}

/// Score of a node the fifty-move rule has reached: a draw, unless the side
/// to move is already checkmated.
fn fifty_move_score(board: &Board, ply: usize) -> i32 {
    if board.in_check(board.side_to_move()) && legal_moves(board).is_empty() {
        -(MATE - ply as i32)
    } else {
        0
    }
}

/// Search state threaded through the recursion.
pub(super) struct SearchContext<'a> {
    pub board: Board,
    /// Occurrences of every position on the game path and the current line.
    pub repetitions: RepetitionTable,
    pub tt: &'a mut TranspositionTable,
    pub killers: &'a mut KillerTable,
    pub history: &'a mut HistoryTable,
    pub pv: &'a mut PvTable,
    pub pruning: Pruning,
    pub control: &'a SearchControl,
    pub stats: SearchStats,
    /// Set once the control asks to stop; every frame then unwinds without
    /// touching the tables.
    pub aborted: bool,
}

impl SearchContext<'_> {
    fn visit(&mut self, ply: usize) -> bool {
        self.stats.nodes += 1;
        self.stats.seldepth = self.stats.seldepth.max(ply);
        if self.control.should_stop(self.stats.nodes) {
            self.aborted = true;
        }
        !self.aborted
    }
}

/// Principal variation search.
///
/// Returns the score for the side to move. The best line from this node is
/// left in `ctx.pv` at `ply`.
pub(super) fn alpha_beta(
    ctx: &mut SearchContext<'_>,
    depth: u8,
    ply: usize,
    mut alpha: i32,
    mut beta: i32,
    allow_null: bool,
) -> i32 {
    ctx.pv.clear_ply(ply);

    if depth == 0 {
        return quiescence(ctx, ply, alpha, beta);
    }
    if !ctx.visit(ply) {
        return 0;
    }

    let hash = ctx.board.hash();
    if ply > 0 {
        if ctx.repetitions.count(hash) >= 2 {
            return 0;
        }
        if ctx.board.halfmove_clock() >= 100 {
            return fifty_move_score(&ctx.board, ply);
        }
        if ply >= MAX_PLY - 1 {
            return evaluate(&ctx.board);
        }
    }

    let is_pv = beta - alpha > 1;
    let original_alpha = alpha;

    let mut tt_move = Move::NULL;
    match ctx.tt.probe(hash, ply) {
        Some(hit) => {
            ctx.stats.tt_hits += 1;
            tt_move = hit.best_move;
            if ply > 0 && hit.depth >= depth {
                match hit.bound {
                    Bound::Exact => return hit.score,
                    Bound::Lower => alpha = alpha.max(hit.score),
                    Bound::Upper => beta = beta.min(hit.score),
                }
                if alpha >= beta {
                    return hit.score;
                }
            }
        }
        None => ctx.stats.tt_misses += 1,
    }

    let us = ctx.board.side_to_move();
    let in_check = ctx.board.in_check(us);

    // Null move: if passing still fails high, a real move will too.
    if allow_null && ctx.pruning.null_move && null_move_allowed(&ctx.board, depth, ply, is_pv, in_check) {
        let undo = ctx.board.make_null_move();
        let score = -alpha_beta(ctx, depth - 1 - NULL_MOVE_REDUCTION, ply + 1, -beta, -beta + 1, false);
        ctx.board.unmake_null_move(undo);
        if ctx.aborted {
            return 0;
        }
        if score >= beta {
            ctx.stats.null_cutoffs += 1;
            return beta;
        }
    }

    let mut moves = MoveList::new();
    generate_moves(&ctx.board, &mut moves);
    let mut picker = MovePicker::new(moves, tt_move, ctx.killers, ctx.history, ply);

    let mut best_score = -INF;
    let mut best_move = Move::NULL;
    let mut searched = 0usize;

    while let Some(mv) = picker.pick_next() {
        let undo = ctx.board.make_move(mv);
        if ctx.board.in_check(us) {
            ctx.board.unmake_move(mv, undo);
            continue;
        }
        let child_hash = ctx.board.hash();
        ctx.repetitions.push(child_hash);

        let score = if searched == 0 {
            -alpha_beta(ctx, depth - 1, ply + 1, -beta, -alpha, true)
        } else {
            let reduction = if ctx.pruning.late_move_reductions {
                late_move_reduction(searched, depth, in_check, mv)
            } else {
                0
            };
            if reduction > 0 {
                ctx.stats.reductions += 1;
            }
            let mut score = -alpha_beta(ctx, depth - 1 - reduction, ply + 1, -alpha - 1, -alpha, true);
            if score > alpha && reduction > 0 && !ctx.aborted {
                ctx.stats.re_searches += 1;
                score = -alpha_beta(ctx, depth - 1, ply + 1, -alpha - 1, -alpha, true);
            }
            if score > alpha && score < beta && !ctx.aborted {
                score = -alpha_beta(ctx, depth - 1, ply + 1, -beta, -alpha, true);
            }
            score
        };

        ctx.repetitions.pop(child_hash);
        ctx.board.unmake_move(mv, undo);
        searched += 1;

        if ctx.aborted {
            return 0;
        }

        if score > best_score {
            best_score = score;
            best_move = mv;
            if score > alpha {
                alpha = score;
                ctx.pv.update(ply, mv);
            }
        }

        if alpha >= beta {
            ctx.stats.beta_cutoffs += 1;
            if mv.is_quiet() {
                ctx.killers.store(ply, mv);
                ctx.history.update(mv, depth);
            }
            break;
        }
    }

    if searched == 0 {
        return if in_check { -(MATE - ply as i32) } else { 0 };
    }

    let bound = if best_score >= beta {
        Bound::Lower
    } else if best_score > original_alpha {
        Bound::Exact
    } else {
        Bound::Upper
    };
    // A fail-low has no meaningful best move; keep the old ordering hint.
    let store_move = if bound == Bound::Upper { tt_move } else { best_move };
    ctx.tt.store(hash, depth, best_score, bound, store_move, ply);

    best_score
}

/// Quiescence search: resolve captures and promotions before trusting the
/// static evaluation.
pub(super) fn quiescence(ctx: &mut SearchContext<'_>, ply: usize, mut alpha: i32, beta: i32) -> i32 {
    if !ctx.visit(ply) {
        return 0;
    }
    ctx.stats.qnodes += 1;

    if ply >= MAX_PLY - 1 {
        return evaluate(&ctx.board);
    }
    if ctx.board.halfmove_clock() >= 100 {
        return fifty_move_score(&ctx.board, ply);
    }

    // Stand-pat: the side to move can choose not to capture.
    let stand_pat = evaluate(&ctx.board);
    if stand_pat >= beta {
        return stand_pat;
    }
    alpha = alpha.max(stand_pat);

    let us = ctx.board.side_to_move();
    let mut moves = MoveList::new();
    generate_captures(&ctx.board, &mut moves);
    let mut picker = MovePicker::new_qsearch(moves);

    while let Some(mv) = picker.pick_next() {
        let undo = ctx.board.make_move(mv);
        if ctx.board.in_check(us) {
            ctx.board.unmake_move(mv, undo);
            continue;
        }
        let score = -quiescence(ctx, ply + 1, -beta, -alpha);
        ctx.board.unmake_move(mv, undo);

        if ctx.aborted {
            return 0;
        }
        if score >= beta {
            return score;
        }
        alpha = alpha.max(score);
    }

    alpha
}

/// Triangular PV table for collecting principal variation lines.
///
/// Row `ply` holds the best line found from that ply onward.
pub struct PvTable {
    moves: Vec<[Move; MAX_PLY]>,
    len: [usize; MAX_PLY],
}

impl PvTable {
    pub fn new() -> Self {
        Self {
            moves: vec![[Move::NULL; MAX_PLY]; MAX_PLY],
            len: [0; MAX_PLY],
        }
    }

    /// Clear the PV line at `ply` (called at the top of each node).
    pub fn clear_ply(&mut self, ply: usize) {
        if ply < MAX_PLY {
            self.len[ply] = 0;
        }
    }

    /// Make `mv` followed by the line at `ply + 1` the line at `ply`.
    pub fn update(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        self.moves[ply][0] = mv;

        let child = ply + 1;
        if child >= MAX_PLY {
            self.len[ply] = 1;
            return;
        }
        let copy_len = self.len[child].min(MAX_PLY - 1);
        // Split so the parent and child rows can be borrowed together.
        let (top, bottom) = self.moves.split_at_mut(child);
        top[ply][1..1 + copy_len].copy_from_slice(&bottom[0][..copy_len]);
        self.len[ply] = 1 + copy_len;
    }

    /// The principal variation from the root.
    pub fn root_pv(&self) -> &[Move] {
        &self.moves[0][..self.len[0]]
    }
}

impl Default for PvTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicBool;
    use vantage_core::parse_uci_move;

    struct Tables {
        tt: TranspositionTable,
        killers: KillerTable,
        history: HistoryTable,
        pv: PvTable,
        control: SearchControl,
    }

    impl Tables {
        fn new() -> Self {
            Self {
                tt: TranspositionTable::new(1),
                killers: KillerTable::new(),
                history: HistoryTable::new(),
                pv: PvTable::new(),
                control: SearchControl::new_infinite(Arc::new(AtomicBool::new(false))),
            }
        }

        fn context(&mut self, fen: &str) -> SearchContext<'_> {
            let board: Board = fen.parse().unwrap();
            let mut repetitions = RepetitionTable::new();
            repetitions.push(board.hash());
            SearchContext {
                board,
                repetitions,
                tt: &mut self.tt,
                killers: &mut self.killers,
                history: &mut self.history,
                pv: &mut self.pv,
                pruning: Pruning::default(),
                control: &self.control,
                stats: SearchStats::default(),
                aborted: false,
            }
        }
    }

    const ITALIAN: &str = "r1bqk1nr/pppp1ppp/2n5/2b1p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const PAWN_ENDING: &str = "8/8/4k3/8/4P3/4K3/8/8 w - - 0 1";

    /// Iterative deepening over one context, like the root loop does.
    fn search_to(ctx: &mut SearchContext<'_>, depth: u8) -> i32 {
        let mut score = 0;
        for d in 1..=depth {
            score = alpha_beta(ctx, d, 0, -INF, INF, false);
        }
        score
    }

    #[test]
    fn mate_distance_in_moves() {
        assert_eq!(mate_distance(MATE - 1), Some(1));
        assert_eq!(mate_distance(MATE - 3), Some(2));
        assert_eq!(mate_distance(-(MATE - 2)), Some(-1));
        assert_eq!(mate_distance(250), None);
        assert!(MATE - 1 > MATE - 3);
    }

    #[test]
    fn search_restores_the_board() {
        let mut tables = Tables::new();
        let mut ctx = tables.context(KIWIPETE);
        let before = ctx.board;
        alpha_beta(&mut ctx, 3, 0, -INF, INF, false);
        assert_eq!(ctx.board, before);
        assert_eq!(ctx.repetitions.count(before.hash()), 1);
        assert!(ctx.stats.nodes > ctx.stats.qnodes);
    }

    #[test]
    fn checkmate_scores_by_ply() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(alpha_beta(&mut ctx, 1, 0, -INF, INF, false), -MATE);
        assert_eq!(alpha_beta(&mut ctx, 1, 3, -INF, INF, false), -(MATE - 3));
    }

    #[test]
    fn finds_back_rank_mate_with_pv() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let score = alpha_beta(&mut ctx, 2, 0, -INF, INF, false);
        assert_eq!(score, MATE - 1);
        let pv = ctx.pv.root_pv().to_vec();
        assert_eq!(pv.first().map(|m| m.to_uci()), Some("a1a8".to_string()));
    }

    #[test]
    fn quiescence_sees_hanging_queen() {
        let fen = "4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1";
        let mut tables = Tables::new();
        let mut ctx = tables.context(fen);
        let static_eval = evaluate(&ctx.board);
        let q = quiescence(&mut ctx, 0, -INF, INF);
        assert!(static_eval < -500);
        assert!(q > 0, "exd5 should win the queen, got {q}");
    }

    #[test]
    fn repeated_position_below_root_is_a_draw() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("r2qk3/8/8/8/8/8/8/4K3 w - - 0 1");
        let drawing = parse_uci_move(&ctx.board, "e1e2").unwrap();
        let mut after = ctx.board;
        after.make_move(drawing);
        ctx.repetitions.push(after.hash());

        let score = alpha_beta(&mut ctx, 3, 0, -INF, INF, false);
        assert_eq!(score, 0);
        assert_eq!(ctx.pv.root_pv().first().copied(), Some(drawing));
    }

    #[test]
    fn aborted_search_writes_nothing() {
        let mut tables = Tables::new();
        tables.control.stop_flag().store(true, std::sync::atomic::Ordering::Relaxed);
        let mut ctx = tables.context(vantage_core::STARTING_FEN);
        let hash = ctx.board.hash();
        alpha_beta(&mut ctx, 4, 0, -INF, INF, false);
        assert!(ctx.aborted);
        assert!(ctx.tt.probe(hash, 0).is_none());
    }

    #[test]
    fn mate_on_the_hundredth_half_move_is_still_mate() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80");
        assert_eq!(alpha_beta(&mut ctx, 2, 0, -INF, INF, false), MATE - 1);
        assert_eq!(ctx.pv.root_pv().first().map(|m| m.to_uci()), Some("a1a8".to_string()));
    }

    #[test]
    fn quiescence_respects_mate_at_the_fifty_move_limit() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 80");
        assert_eq!(alpha_beta(&mut ctx, 1, 0, -INF, INF, false), MATE - 1);
    }

    #[test]
    fn fifty_move_rule_draws_below_the_root() {
        let mut tables = Tables::new();
        let mut ctx = tables.context("4k3/8/8/8/8/8/8/R3K3 w - - 100 80");
        assert_eq!(alpha_beta(&mut ctx, 3, 0, -INF, INF, false), 0);
    }

    #[test]
    fn null_move_gates() {
        let middlegame: Board = ITALIAN.parse().unwrap();
        assert!(null_move_allowed(&middlegame, 3, 1, false, false));
        assert!(!null_move_allowed(&middlegame, 3, 0, false, false), "root");
        assert!(!null_move_allowed(&middlegame, 3, 1, true, false), "pv node");
        assert!(!null_move_allowed(&middlegame, 3, 1, false, true), "in check");
        assert!(!null_move_allowed(&middlegame, 2, 1, false, false), "too shallow");

        let pawns: Board = PAWN_ENDING.parse().unwrap();
        assert!(!null_move_allowed(&pawns, 6, 1, false, false), "pawns only");
    }

    #[test]
    fn null_move_prunes_in_the_middlegame() {
        let mut tables = Tables::new();
        let mut ctx = tables.context(ITALIAN);
        search_to(&mut ctx, 5);
        assert!(ctx.stats.null_cutoffs > 0);
    }

    #[test]
    fn pawn_endings_never_pass() {
        let mut with_null = Tables::new();
        let mut ctx = with_null.context(PAWN_ENDING);
        let score = search_to(&mut ctx, 5);
        let best = ctx.pv.root_pv().first().copied();
        assert_eq!(ctx.stats.null_cutoffs, 0);
        assert!(best.is_some());

        let mut without_null = Tables::new();
        let mut plain = without_null.context(PAWN_ENDING);
        plain.pruning.null_move = false;
        assert_eq!(search_to(&mut plain, 5), score);
        assert_eq!(plain.pv.root_pv().first().copied(), best);
        assert_eq!(plain.stats.nodes, ctx.stats.nodes);
    }

    #[test]
    fn late_move_reduction_gates() {
        let board: Board = ITALIAN.parse().unwrap();
        let quiet = parse_uci_move(&board, "d2d3").unwrap();
        let capture = parse_uci_move(&board, "c4f7").unwrap();
        assert_eq!(late_move_reduction(4, 3, false, quiet), 1);
        assert_eq!(late_move_reduction(3, 3, false, quiet), 0, "early move");
        assert_eq!(late_move_reduction(4, 2, false, quiet), 0, "too shallow");
        assert_eq!(late_move_reduction(4, 3, true, quiet), 0, "in check");
        assert_eq!(late_move_reduction(4, 3, false, capture), 0, "capture");
    }

    #[test]
    fn reduced_moves_that_beat_alpha_are_searched_again() {
        let mut tables = Tables::new();
        let mut ctx = tables.context(KIWIPETE);
        search_to(&mut ctx, 5);
        assert!(ctx.stats.reductions > 0);
        assert!(ctx.stats.re_searches > 0);
        assert!(ctx.stats.re_searches <= ctx.stats.reductions);
    }

    #[test]
    fn quiet_mating_move_survives_reduction() {
        for lmr in [true, false] {
            let mut tables = Tables::new();
            let mut ctx = tables.context("7k/8/8/8/8/8/R7/1R4K1 w - - 0 1");
            ctx.pruning.late_move_reductions = lmr;
            assert_eq!(search_to(&mut ctx, 5), MATE - 3, "late move reductions: {lmr}");
            if !lmr {
                assert_eq!(ctx.stats.reductions, 0);
            }
        }
    }

    #[test]
    fn pv_table_update_copies_child_line() {
        let mut pv = PvTable::new();
        let b: Board = vantage_core::STARTING_FEN.parse().unwrap();
        let e4 = parse_uci_move(&b, "e2e4").unwrap();
        let nf3 = parse_uci_move(&b, "g1f3").unwrap();

        pv.clear_ply(1);
        pv.update(1, nf3);
        pv.update(0, e4);
        assert_eq!(pv.root_pv(), &[e4, nf3]);

        pv.clear_ply(1);
        pv.update(0, nf3);
        assert_eq!(pv.root_pv(), &[nf3]);
    }
}
