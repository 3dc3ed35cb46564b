//! Sliding-piece attacks by walking rays until the first blocker.

use crate::bitboard::Bitboard;
use crate::square::Square;

pub(super) const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub(super) const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// Walk each `(rank, file)` direction from `sq`. The first occupied square on
/// a ray is included (it may be a capture) and ends that ray.
#[inline]
pub(super) fn slide(sq: Square, occupied: Bitboard, dirs: &[(i8, i8); 4]) -> Bitboard {
    let mut attacks = 0u64;
    for &(dr, df) in dirs {
        let mut r = sq.rank() as i8 + dr;
        let mut f = sq.file() as i8 + df;
        while (0..8).contains(&r) && (0..8).contains(&f) {
            let bit = 1u64 << (r * 8 + f);
            attacks |= bit;
            if occupied.bits() & bit != 0 {
                break;
            }
            r += dr;
            f += df;
        }
    }
    Bitboard::new(attacks)
}
