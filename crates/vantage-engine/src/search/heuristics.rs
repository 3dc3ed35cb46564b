//! Killer move table and history heuristic for quiet move ordering.

use vantage_core::Move;

use crate::search::alphabeta::MAX_PLY;

/// Two killer moves per ply: quiet moves that caused beta cutoffs.
pub struct KillerTable {
    slots: [[Move; 2]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        Self {
            slots: [[Move::NULL; 2]; MAX_PLY],
        }
    }

    /// Store a killer move at the given ply.
    ///
    /// Shifts slot 0 to slot 1 if the new move differs from slot 0.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if ply >= MAX_PLY {
            return;
        }
        if self.slots[ply][0] != mv {
            self.slots[ply][1] = self.slots[ply][0];
            self.slots[ply][0] = mv;
        }
    }

    /// Which slot holds `mv` at `ply`, if any.
    pub fn slot_of(&self, ply: usize, mv: Move) -> Option<usize> {
        if ply >= MAX_PLY || mv.is_null() {
            return None;
        }
        self.slots[ply].iter().position(|k| *k == mv)
    }

    pub fn is_killer(&self, ply: usize, mv: Move) -> bool {
        self.slot_of(ply, mv).is_some()
    }

    pub fn clear(&mut self) {
        self.slots = [[Move::NULL; 2]; MAX_PLY];
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

/// When any cell passes this value the whole table is halved.
const HISTORY_LIMIT: i32 = 100_000;

/// History heuristic indexed by `[from][to]`.
///
/// Quiet moves that cause a beta cutoff earn `depth * depth`.
pub struct HistoryTable {
    table: [[i32; 64]; 64],
}

impl HistoryTable {
    pub fn new() -> Self {
        Self {
            table: [[0; 64]; 64],
        }
    }

    /// Reward a quiet move that caused a beta cutoff.
    pub fn update(&mut self, mv: Move, depth: u8) {
        let bonus = i32::from(depth) * i32::from(depth);
        let entry = &mut self.table[mv.from.index()][mv.to.index()];
        *entry += bonus;
        if *entry > HISTORY_LIMIT {
            self.age();
        }
    }

    pub fn score(&self, mv: Move) -> i32 {
        self.table[mv.from.index()][mv.to.index()]
    }

    /// Halve every cell, keeping relative order while fading old evidence.
    pub fn age(&mut self) {
        for row in &mut self.table {
            for cell in row.iter_mut() {
                *cell /= 2;
            }
        }
    }

    pub fn clear(&mut self) {
        self.table = [[0; 64]; 64];
    }

    #[cfg(test)]
    pub(crate) fn total(&self) -> i64 {
        self.table.iter().flatten().map(|&v| i64::from(v)).sum()
    }
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}
