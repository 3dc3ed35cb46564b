//! Iterative-deepening search over the alpha-beta core.

pub mod alphabeta;
pub mod control;
pub mod heuristics;
pub mod ordering;
pub mod stats;
pub mod tt;

use std::time::Duration;

use tracing::debug;
use vantage_core::{Board, Move, RepetitionTable, legal_moves};

use crate::config::{DEFAULT_HASH_MB, DEFAULT_MAX_DEPTH, HistoryPolicy};
use alphabeta::{INF, MATE, MAX_PLY, Pruning, PvTable, SearchContext, alpha_beta, is_mate_score};
use control::SearchControl;
use heuristics::{HistoryTable, KillerTable};
use stats::SearchStats;
use tt::TranspositionTable;

/// Per-search limits beyond the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Deepest iteration to run, clamped to `1..MAX_PLY`.
    pub max_depth: u8,
}

impl SearchLimits {
    pub fn depth(max_depth: u8) -> Self {
        Self { max_depth }
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self::depth(DEFAULT_MAX_DEPTH)
    }
}

/// Snapshot reported after each completed iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchProgress {
    pub depth: u8,
    pub score: i32,
    pub nodes: u64,
    pub seldepth: usize,
    pub elapsed: Duration,
    pub pv: Vec<Move>,
}

/// Result of a finished search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// Best move at the deepest completed depth. Falls back to the first
    /// legal move when not even depth 1 finished; `None` only when the
    /// position has no legal moves.
    pub best_move: Option<Move>,
    /// Score in centipawns from the side to move's point of view.
    pub score: i32,
    /// Deepest fully completed iteration, 0 if none.
    pub depth: u8,
    pub pv: Vec<Move>,
    pub stats: SearchStats,
    pub elapsed: Duration,
}

impl SearchResult {
    pub fn nps(&self) -> u64 {
        self.stats.nps(self.elapsed)
    }
}

/// Iterative-deepening searcher.
///
/// Owns the transposition table and the ordering heuristics, which carry
/// over between searches of the same game.
pub struct Searcher {
    tt: TranspositionTable,
    killers: KillerTable,
    history: HistoryTable,
    pv: PvTable,
    history_policy: HistoryPolicy,
}

impl Searcher {
    pub fn new(hash_mb: usize, history_policy: HistoryPolicy) -> Self {
        Self {
            tt: TranspositionTable::new(hash_mb),
            killers: KillerTable::new(),
            history: HistoryTable::new(),
            pv: PvTable::new(),
            history_policy,
        }
    }

    /// Replace the transposition table with one of `mb` MiB.
    pub fn resize_tt(&mut self, mb: usize) {
        self.tt = TranspositionTable::new(mb);
    }

    pub fn set_history_policy(&mut self, policy: HistoryPolicy) {
        self.history_policy = policy;
    }

    pub fn tt(&self) -> &TranspositionTable {
        &self.tt
    }

    /// Forget everything learned so far, e.g. for a new game.
    pub fn clear(&mut self) {
        self.tt.clear();
        self.killers.clear();
        self.history.clear();
    }

    fn begin_search(&mut self) {
        self.tt.new_age();
        self.killers.clear();
        match self.history_policy {
            HistoryPolicy::Age => self.history.age(),
            HistoryPolicy::Reset => self.history.clear(),
        }
    }

    /// Search `board` by iterative deepening.
    ///
    /// `repetitions` holds the game's earlier positions, the root included.
    /// `on_depth` runs once per completed iteration. An iteration cut short
    /// by `control` is discarded.
    pub fn search<F>(
        &mut self,
        board: &Board,
        repetitions: &RepetitionTable,
        limits: SearchLimits,
        control: &SearchControl,
        mut on_depth: F,
    ) -> SearchResult
    where
        F: FnMut(&SearchProgress),
    {
        self.begin_search();

        let root_moves = legal_moves(board);
        let mut result = SearchResult {
            best_move: root_moves.iter().next().copied(),
            score: 0,
            depth: 0,
            pv: Vec::new(),
            stats: SearchStats::default(),
            elapsed: Duration::ZERO,
        };

        if root_moves.is_empty() {
            if board.in_check(board.side_to_move()) {
                result.score = -MATE;
            }
            result.elapsed = control.elapsed();
            return result;
        }

        let max_depth = limits.max_depth.clamp(1, (MAX_PLY - 1) as u8);
        let mut ctx = SearchContext {
            board: *board,
            repetitions: repetitions.clone(),
            tt: &mut self.tt,
            killers: &mut self.killers,
            history: &mut self.history,
            pv: &mut self.pv,
            pruning: Pruning::default(),
            control,
            stats: SearchStats::default(),
            aborted: false,
        };

        for depth in 1..=max_depth {
            if depth > 1 && control.should_stop_iterating() {
                break;
            }

            let score = alpha_beta(&mut ctx, depth, 0, -INF, INF, false);
            if ctx.aborted {
                debug!(depth, nodes = ctx.stats.nodes, "search aborted mid-iteration");
                break;
            }

            let pv = ctx.pv.root_pv().to_vec();
            if let Some(first) = pv.first() {
                result.best_move = Some(*first);
            }
            result.score = score;
            result.depth = depth;
            result.pv = pv;

            let progress = SearchProgress {
                depth,
                score,
                nodes: ctx.stats.nodes,
                seldepth: ctx.stats.seldepth,
                elapsed: control.elapsed(),
                pv: result.pv.clone(),
            };
            debug!(depth, score, nodes = progress.nodes, "depth complete");
            on_depth(&progress);

            if is_mate_score(score) {
                break;
            }
        }

        result.stats = ctx.stats;
        result.elapsed = control.elapsed();
        result
    }
}

impl std::fmt::Debug for Searcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Searcher")
            .field("tt", &self.tt)
            .field("history_policy", &self.history_policy)
            .finish()
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(DEFAULT_HASH_MB, HistoryPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use alphabeta::MATE_THRESHOLD;
    use vantage_core::{Game, GameStatus};

    fn game(fen: &str) -> Game {
        Game::new(fen.parse().unwrap())
    }

    fn search_depth(searcher: &mut Searcher, game: &Game, depth: u8) -> SearchResult {
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        searcher.search(game.board(), game.repetitions(), SearchLimits::depth(depth), &control, |_| {})
    }

    #[test]
    fn depth_1_returns_legal_move() {
        let g = Game::default();
        let result = search_depth(&mut Searcher::default(), &g, 1);
        let best = result.best_move.expect("a move at depth 1");
        assert!(g.legal_moves().contains(best));
        assert_eq!(result.depth, 1);
    }

    #[test]
    fn finds_mate_in_one() {
        let g = game("r1bqkb1r/pppp1ppp/2n2n2/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 4 4");
        let result = search_depth(&mut Searcher::default(), &g, 4);
        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("h5f7".to_string()));
        assert_eq!(result.score, MATE - 1);
        // Mate ends the deepening early.
        assert_eq!(result.depth, 2);
    }

    #[test]
    fn finds_mate_in_two() {
        let mut g = game("7k/8/8/8/8/8/R7/1R4K1 w - - 0 1");
        let result = search_depth(&mut Searcher::default(), &g, 6);
        assert_eq!(result.score, MATE - 3);
        assert!(result.score > MATE_THRESHOLD);

        g.play(result.best_move.expect("mating move")).unwrap();
        for reply in g.legal_moves() {
            let mut line = g.clone();
            line.play(reply).unwrap();
            let mates = line.legal_moves().into_iter().any(|m| {
                let mut finish = line.clone();
                finish.play(m).unwrap();
                finish.status() == GameStatus::Checkmate
            });
            assert!(mates, "no mate after {reply}");
        }
    }

    #[test]
    fn shorter_mate_scores_higher() {
        let mut searcher = Searcher::default();
        let in_one = search_depth(&mut searcher, &game("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1"), 4);
        let in_two = search_depth(&mut searcher, &game("7k/8/8/8/8/8/R7/1R4K1 w - - 0 1"), 6);
        assert!(in_one.score > in_two.score);
        assert!(in_two.score > MATE_THRESHOLD);
    }

    #[test]
    fn stalemate_has_no_move_and_scores_zero() {
        let result = search_depth(&mut Searcher::default(), &game("k7/2K5/1Q6/8/8/8/8/8 b - - 0 1"), 3);
        assert_eq!(result.score, 0);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn checkmated_root_scores_minus_mate() {
        let result = search_depth(&mut Searcher::default(), &game("7k/6Q1/5K2/8/8/8/8/8 b - - 0 1"), 3);
        assert_eq!(result.score, -MATE);
        assert_eq!(result.best_move, None);
    }

    #[test]
    fn callback_runs_once_per_depth() {
        let g = Game::default();
        let control = SearchControl::new_infinite(Arc::new(AtomicBool::new(false)));
        let mut seen = Vec::new();
        let result = Searcher::default().search(
            g.board(),
            g.repetitions(),
            SearchLimits::depth(4),
            &control,
            |p| seen.push((p.depth, p.nodes, p.pv.first().copied())),
        );
        assert_eq!(seen.iter().map(|s| s.0).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(seen.windows(2).all(|w| w[0].1 <= w[1].1), "node counts only grow");
        assert!(seen.iter().all(|s| s.2.is_some()));
        assert_eq!(result.pv.first().copied(), result.best_move);
        assert!(result.stats.nodes > 0);
        assert!(result.stats.tt_hits + result.stats.tt_misses > 0);
    }

    #[test]
    fn stopped_search_falls_back_to_first_legal_move() {
        let g = Game::default();
        let flag = Arc::new(AtomicBool::new(true));
        let control = SearchControl::new_infinite(flag);
        let mut calls = 0;
        let result = Searcher::default().search(g.board(), g.repetitions(), SearchLimits::depth(10), &control, |_| {
            calls += 1
        });
        assert_eq!(calls, 0);
        assert_eq!(result.depth, 0);
        assert_eq!(result.best_move, g.legal_moves().iter().next().copied());
    }

    #[test]
    fn stop_during_search_keeps_last_completed_depth() {
        let g = game("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        let flag = Arc::new(AtomicBool::new(false));
        let control = SearchControl::new_infinite(Arc::clone(&flag));
        let mut completed = 0;
        let result = Searcher::default().search(g.board(), g.repetitions(), SearchLimits::depth(40), &control, |p| {
            completed = p.depth;
            if p.depth == 2 {
                flag.store(true, Ordering::Relaxed);
            }
        });
        assert_eq!(completed, 2);
        assert_eq!(result.depth, 2);
        assert!(result.best_move.is_some());
    }

    #[test]
    fn repetition_is_scored_as_draw() {
        let mut g = game("r2qk3/8/8/8/8/8/8/4K3 w - - 0 1");
        // Shuffle so that the position after Ke2 has been seen before.
        for mv in ["e1e2", "e8f8", "e2e1", "f8e8"] {
            g.play_uci(mv).unwrap();
        }
        let result = search_depth(&mut Searcher::default(), &g, 3);
        assert_eq!(result.best_move.map(|m| m.to_uci()), Some("e1e2".to_string()));
        assert_eq!(result.score, 0);
    }

    fn trained_searcher(policy: HistoryPolicy) -> Searcher {
        let mut searcher = Searcher::new(1, policy);
        let g = game("r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1");
        search_depth(&mut searcher, &g, 4);
        searcher
    }

    #[test]
    fn history_ages_between_searches_by_default() {
        let mut searcher = trained_searcher(HistoryPolicy::Age);
        let before = searcher.history.total();
        assert!(before > 0, "depth 4 search should record quiet cutoffs");

        searcher.begin_search();
        let after = searcher.history.total();
        assert!(after > 0, "{before} -> {after}");
        assert!(after * 2 <= before, "{before} -> {after}");
    }

    #[test]
    fn history_resets_between_searches_when_configured() {
        let mut searcher = trained_searcher(HistoryPolicy::Reset);
        searcher.begin_search();
        assert_eq!(searcher.history.total(), 0);
    }

    #[test]
    fn searches_are_repeatable_after_clear() {
        let g = game("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq - 2 3");
        let mut searcher = Searcher::new(1, HistoryPolicy::Reset);
        let first = search_depth(&mut searcher, &g, 4);
        searcher.clear();
        let second = search_depth(&mut searcher, &g, 4);
        assert_eq!(first.best_move, second.best_move);
        assert_eq!(first.score, second.score);
        assert_eq!(first.stats.nodes, second.stats.nodes);
    }
}
