//! Transposition table keyed by Zobrist hash.
//!
//! One entry per slot, indexed by the low bits of the hash and verified
//! against the full 64-bit key. The table belongs to a single searcher, so
//! entries are plain values rather than atomics.

use std::mem;

use vantage_core::Move;

use crate::search::alphabeta::MATE_THRESHOLD;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The score is exact (alpha was raised without failing high).
    Exact,
    /// Failed high: the true value is at least the score.
    Lower,
    /// Failed low: the true value is at most the score.
    Upper,
}

#[derive(Debug, Clone, Copy)]
struct TtEntry {
    key: u64,
    best_move: Move,
    score: i32,
    depth: u8,
    bound: Bound,
    age: u8,
}

/// A successful probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtHit {
    /// Best or refuting move, [`Move::NULL`] if none was found.
    pub best_move: Move,
    /// Score relative to the probing ply.
    pub score: i32,
    pub depth: u8,
    pub bound: Bound,
}

/// Convert a root-relative mate score to a node-relative one for storage.
fn score_to_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score + ply
    } else if score <= -MATE_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
fn score_from_tt(score: i32, ply: usize) -> i32 {
    let ply = ply as i32;
    if score >= MATE_THRESHOLD {
        score - ply
    } else if score <= -MATE_THRESHOLD {
        score + ply
    } else {
        score
    }
}

pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    mask: u64,
    age: u8,
    hits: u64,
    misses: u64,
}

impl TranspositionTable {
    /// Allocate a table of roughly `mb` mebibytes.
    ///
    /// The slot count is rounded down to a power of two (minimum 1024).
    pub fn new(mb: usize) -> Self {
        let bytes = mb.max(1) * 1024 * 1024;
        let slots = bytes / mem::size_of::<Option<TtEntry>>();
        let count = if slots.is_power_of_two() {
            slots
        } else {
            slots.next_power_of_two() / 2
        }
        .max(1024);

        Self {
            entries: vec![None; count],
            mask: (count - 1) as u64,
            age: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Number of slots.
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Empty every slot and reset the counters.
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.age = 0;
        self.hits = 0;
        self.misses = 0;
    }

    /// Start a new root search. Entries from earlier searches become
    /// replaceable regardless of depth.
    pub fn new_age(&mut self) {
        self.age = self.age.wrapping_add(1);
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Fraction of probes that found a matching entry.
    pub fn hit_rate(&self) -> f64 {
        let probes = self.hits + self.misses;
        if probes == 0 { 0.0 } else { self.hits as f64 / probes as f64 }
    }

    /// Look up `hash`. A slot holding a different key counts as a miss.
    pub fn probe(&mut self, hash: u64, ply: usize) -> Option<TtHit> {
        let index = (hash & self.mask) as usize;
        match self.entries[index] {
            Some(entry) if entry.key == hash => {
                self.hits += 1;
                Some(TtHit {
                    best_move: entry.best_move,
                    score: score_from_tt(entry.score, ply),
                    depth: entry.depth,
                    bound: entry.bound,
                })
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Record a search result.
    ///
    /// The slot is overwritten when it is empty, holds the same position,
    /// holds a result no deeper than this one, or was written by an earlier
    /// search.
    pub fn store(&mut self, hash: u64, depth: u8, score: i32, bound: Bound, best_move: Move, ply: usize) {
        let index = (hash & self.mask) as usize;
        let replace = match self.entries[index] {
            None => true,
            Some(old) => old.key == hash || depth >= old.depth || old.age != self.age,
        };
        if !replace {
            return;
        }

        self.entries[index] = Some(TtEntry {
            key: hash,
            best_move,
            score: score_to_tt(score, ply),
            depth,
            bound,
            age: self.age,
        });
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("entries", &self.entries.len())
            .field("age", &self.age)
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish()
    }
}
