//! Const-built attack tables for the non-sliding pieces.

use crate::bitboard::Bitboard;

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (-1, -1), (-1, 0), (-1, 1),
    (0, -1),           (0, 1),
    (1, -1),  (1, 0),  (1, 1),
];

/// Build a table from (rank, file) jump offsets, dropping targets off the board.
const fn leaper_table(deltas: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut sq = 0usize;
    while sq < 64 {
        let rank = (sq / 8) as i8;
        let file = (sq % 8) as i8;
        let mut bits = 0u64;
        let mut d = 0;
        while d < deltas.len() {
            let r = rank + deltas[d].0;
            let f = file + deltas[d].1;
            if r >= 0 && r < 8 && f >= 0 && f < 8 {
                bits |= 1u64 << ((r * 8 + f) as u32);
            }
            d += 1;
        }
        table[sq] = Bitboard::new(bits);
        sq += 1;
    }
    table
}

/// Index 0 = squares a white pawn attacks, index 1 = black.
const fn pawn_table() -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0usize;
    while sq < 64 {
        let bb = Bitboard::new(1u64 << sq);
        table[0][sq] = Bitboard::new(bb.north().east().bits() | bb.north().west().bits());
        table[1][sq] = Bitboard::new(bb.south().east().bits() | bb.south().west().bits());
        sq += 1;
    }
    table
}

pub(super) static KNIGHT: [Bitboard; 64] = leaper_table(&KNIGHT_DELTAS);
pub(super) static KING: [Bitboard; 64] = leaper_table(&KING_DELTAS);
pub(super) static PAWN: [[Bitboard; 64]; 2] = pawn_table();
