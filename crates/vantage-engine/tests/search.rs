//! Integration tests for iterative-deepening search through the public API.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::{Duration, Instant};

use vantage_core::{Board, Game, RepetitionTable};
use vantage_engine::{
    HistoryPolicy, MATE, SearchControl, SearchLimits, SearchResult, Searcher, TimeBudget, mate_distance,
};

const SCHOLARS_MATE_FEN: &str = "r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4";

const KIWIPETE_FEN: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

const LADDER_MATE_IN_TWO_FEN: &str = "7k/8/8/8/8/8/R7/1R4K1 w - - 0 1";

fn search(fen: &str, depth: u8) -> SearchResult {
    let board: Board = fen.parse().unwrap();
    let mut repetitions = RepetitionTable::new();
    repetitions.push(board.hash());
    let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
    Searcher::new(4, HistoryPolicy::Age).search(&board, &repetitions, SearchLimits::depth(depth), &control, |_| {})
}

// ── Tactics ──────────────────────────────────────────────────────────────────

#[test]
fn finds_scholars_mate() {
    let result = search(SCHOLARS_MATE_FEN, 3);
    assert_eq!(result.best_move.map(|m| m.to_uci()), Some("h5f7".to_string()));
    assert_eq!(mate_distance(result.score), Some(1));
}

#[test]
fn mate_in_two_is_reported_as_two_moves() {
    let result = search(LADDER_MATE_IN_TWO_FEN, 6);
    assert_eq!(result.score, MATE - 3);
    assert_eq!(mate_distance(result.score), Some(2));
}

#[test]
fn defender_escapes_back_rank_mate() {
    // Black to move can still make room for the king before Ra8.
    let result = search("6k1/5ppp/8/8/8/8/8/R5K1 b - - 0 1", 4);
    assert!(result.best_move.is_some());
    assert_eq!(mate_distance(result.score), None);
}

#[test]
fn wins_a_hanging_queen() {
    let result = search("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1", 3);
    assert_eq!(result.best_move.map(|m| m.to_uci()), Some("e4d5".to_string()));
    assert!(result.score > 0);
}

// ── Reporting ────────────────────────────────────────────────────────────────

#[test]
fn pv_starts_with_best_move_and_is_legal() {
    let result = search(KIWIPETE_FEN, 4);
    assert_eq!(result.pv.first().copied(), result.best_move);

    let mut game = Game::new(KIWIPETE_FEN.parse().unwrap());
    for mv in &result.pv {
        game.play(*mv).unwrap_or_else(|e| panic!("pv move {mv} rejected: {e}"));
    }
}

#[test]
fn statistics_are_populated() {
    let result = search(KIWIPETE_FEN, 4);
    let stats = result.stats;
    assert!(stats.nodes > stats.qnodes && stats.qnodes > 0);
    assert!(stats.beta_cutoffs > 0);
    assert!(stats.tt_hits + stats.tt_misses > 0);
    assert!(stats.seldepth >= 4, "leaves are reached");
    assert!(result.elapsed > Duration::ZERO);
}

// ── Time and cancellation ────────────────────────────────────────────────────

#[test]
fn move_time_is_respected() {
    let board = Board::starting_position();
    let mut repetitions = RepetitionTable::new();
    repetitions.push(board.hash());
    let control = SearchControl::new(
        Arc::new(AtomicBool::new(false)),
        TimeBudget::move_time(Duration::from_millis(100)),
    );

    let start = Instant::now();
    let result = Searcher::default().search(&board, &repetitions, SearchLimits::depth(100), &control, |_| {});
    assert!(start.elapsed() < Duration::from_secs(2), "took {:?}", start.elapsed());
    assert!(result.best_move.is_some());
    assert!(result.depth >= 1);
}

#[test]
#[ignore] // slow in debug builds
fn deeper_search_on_kiwipete() {
    let result = search(KIWIPETE_FEN, 7);
    assert_eq!(result.depth, 7);
    assert!(result.best_move.is_some());
}
