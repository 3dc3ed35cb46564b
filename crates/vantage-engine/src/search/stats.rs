//! Counters collected during one search.

use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Main-search and quiescence nodes together.
    pub nodes: u64,
    /// Nodes visited by quiescence search alone.
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_misses: u64,
    /// Fail-highs in the main search, null-move cutoffs excluded.
    pub beta_cutoffs: u64,
    pub null_cutoffs: u64,
    /// Late quiet moves searched at reduced depth.
    pub reductions: u64,
    /// Reduced searches that beat alpha and were repeated at full depth.
    pub re_searches: u64,
    /// Deepest ply reached, quiescence included.
    pub seldepth: usize,
}

impl SearchStats {
    /// Nodes per second over `elapsed`.
    pub fn nps(&self, elapsed: Duration) -> u64 {
        let micros = elapsed.as_micros();
        if micros == 0 {
            return 0;
        }
        (u128::from(self.nodes) * 1_000_000 / micros) as u64
    }
}
