//! Pawn structure: passed, isolated, doubled and backward pawns.
//!
//! Scores are from White's perspective (positive = White advantage).

use vantage_core::{Bitboard, Board, Color, PieceKind, Square};

use crate::eval::score::{S, Score};

/// For each file index 0-7, the neighbouring files.
pub(crate) static ADJACENT_FILES: [Bitboard; 8] = compute_adjacent_files();

/// Squares ahead of a pawn on its own and neighbouring files, per `[color][square]`.
/// The pawn is passed when no enemy pawn stands inside this mask.
pub(crate) static PASSED_PAWN_MASK: [[Bitboard; 64]; 2] = compute_forward_masks(true);

/// Squares level with or behind a pawn on the neighbouring files, per `[color][square]`.
/// Friendly pawns here can still come up to defend it.
static SUPPORT_MASK: [[Bitboard; 64]; 2] = compute_forward_masks(false);

const ISOLATED_PAWN_PENALTY: Score = S(-20, -20);
const DOUBLED_PAWN_PENALTY: Score = S(-10, -10);
const BACKWARD_PAWN_PENALTY: Score = S(-15, -15);

const fn compute_adjacent_files() -> [Bitboard; 8] {
    let mut table = [Bitboard::EMPTY; 8];
    let mut f = 0u8;
    while f < 8 {
        let mut bits = 0u64;
        if f > 0 {
            bits |= Bitboard::file(f - 1).bits();
        }
        if f < 7 {
            bits |= Bitboard::file(f + 1).bits();
        }
        table[f as usize] = Bitboard::new(bits);
        f += 1;
    }
    table
}

/// With `ahead`, ranks strictly in front of the pawn on its file span;
/// otherwise ranks at or behind it on the adjacent files only.
const fn compute_forward_masks(ahead: bool) -> [[Bitboard; 64]; 2] {
    let mut table = [[Bitboard::EMPTY; 64]; 2];
    let mut sq = 0usize;
    while sq < 64 {
        let rank = (sq / 8) as u8;
        let file = (sq % 8) as u8;
        let adjacent = compute_adjacent_files()[file as usize].bits();
        let files = if ahead { adjacent | Bitboard::file(file).bits() } else { adjacent };

        let mut white = 0u64;
        let mut black = 0u64;
        let mut r = 0u8;
        while r < 8 {
            let rank_bits = Bitboard::rank(r).bits();
            let (w, b) = if ahead { (r > rank, r < rank) } else { (r <= rank, r >= rank) };
            if w {
                white |= rank_bits;
            }
            if b {
                black |= rank_bits;
            }
            r += 1;
        }
        table[0][sq] = Bitboard::new(files & white);
        table[1][sq] = Bitboard::new(files & black);
        sq += 1;
    }
    table
}

/// Squares attacked by any pawn of `color` in `pawns`.
pub(crate) fn pawn_attack_span(pawns: Bitboard, color: Color) -> Bitboard {
    let pushed = match color {
        Color::White => pawns.north(),
        Color::Black => pawns.south(),
    };
    pushed.east() | pushed.west()
}

/// Rank counted from `color`'s own side, 0 to 7.
#[inline]
fn relative_rank(sq: Square, color: Color) -> i16 {
    match color {
        Color::White => sq.rank() as i16,
        Color::Black => 7 - sq.rank() as i16,
    }
}

/// Bonus for a passed pawn, growing with the square of its advance.
#[inline]
pub fn passed_pawn_bonus(sq: Square, color: Color) -> Score {
    let rank = relative_rank(sq, color);
    S(rank * rank * 5, rank * rank * 5)
}

pub fn evaluate_pawns(board: &Board) -> Score {
    let white = board.pieces(Color::White, PieceKind::Pawn);
    let black = board.pieces(Color::Black, PieceKind::Pawn);
    side_score(white, black, Color::White) - side_score(black, white, Color::Black)
}

fn side_score(ours: Bitboard, theirs: Bitboard, color: Color) -> Score {
    let mut score = Score::ZERO;
    let enemy_attacks = pawn_attack_span(theirs, color.flip());

    for sq in ours {
        let file = sq.file() as usize;
        let passed = (PASSED_PAWN_MASK[color.index()][sq.index()] & theirs).is_empty();

        if passed {
            score += passed_pawn_bonus(sq, color);
        }

        if (ADJACENT_FILES[file] & ours).is_empty() {
            score += ISOLATED_PAWN_PENALTY;
        } else if !passed && (SUPPORT_MASK[color.index()][sq.index()] & ours).is_empty() {
            let stop = match color {
                Color::White => sq.bitboard().north(),
                Color::Black => sq.bitboard().south(),
            };
            if (stop & enemy_attacks).is_nonempty() {
                score += BACKWARD_PAWN_PENALTY;
            }
        }
    }

    for file in 0..8u8 {
        let on_file = (Bitboard::file(file) & ours).count() as i16;
        if on_file > 1 {
            score += DOUBLED_PAWN_PENALTY * (on_file - 1);
        }
    }

    score
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pawns_of(fen: &str) -> Score {
        evaluate_pawns(&fen.parse().unwrap())
    }

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn starting_position_is_neutral() {
        assert_eq!(evaluate_pawns(&Board::starting_position()), Score::ZERO);
    }

    #[test]
    fn passed_mask_covers_three_files_ahead() {
        let mask = PASSED_PAWN_MASK[Color::White.index()][sq("e4").index()];
        assert!(mask.contains(sq("d5")) && mask.contains(sq("e7")) && mask.contains(sq("f8")));
        assert!(!mask.contains(sq("e4")) && !mask.contains(sq("d3")) && !mask.contains(sq("c5")));

        let mask = PASSED_PAWN_MASK[Color::Black.index()][sq("e5").index()];
        assert!(mask.contains(sq("d4")) && mask.contains(sq("f1")));
        assert!(!mask.contains(sq("e6")));
    }

    #[test]
    fn passed_pawn_bonus_is_quadratic_in_rank() {
        assert_eq!(passed_pawn_bonus(sq("e7"), Color::White), S(180, 180));
        assert_eq!(passed_pawn_bonus(sq("e2"), Color::Black), S(180, 180));
        assert_eq!(passed_pawn_bonus(sq("a2"), Color::White), S(5, 5));
    }

    #[test]
    fn lone_passer_is_isolated_too() {
        // e5 passed (rank index 4): 80, isolated: -20.
        assert_eq!(pawns_of("4k3/8/8/4P3/8/8/8/4K3 w - - 0 1"), S(60, 60));
    }

    #[test]
    fn blocked_pawn_is_not_passed() {
        // White e4, black e5: both isolated, neither passed.
        assert_eq!(pawns_of("4k3/8/8/4p3/4P3/8/8/4K3 w - - 0 1"), Score::ZERO);
    }

    #[test]
    fn doubled_pawns() {
        // White c3/c4 are doubled and isolated. Black c6/d6 guard each other.
        let score = pawns_of("4k3/8/2pp4/8/2P5/2P5/8/4K3 w - - 0 1");
        assert_eq!(score, ISOLATED_PAWN_PENALTY * 2 + DOUBLED_PAWN_PENALTY);
    }

    #[test]
    fn backward_pawn() {
        // White d3 trails c4; its stop square d4 is hit by the black pawn on e5.
        let score = pawns_of("4k3/8/8/4p3/2P5/3P4/8/4K3 w - - 0 1");
        let c4_passed = passed_pawn_bonus(sq("c4"), Color::White);
        assert_eq!(score, c4_passed + BACKWARD_PAWN_PENALTY - ISOLATED_PAWN_PENALTY);
    }
}
