//! King safety: a flat bonus once a side can no longer castle at all.

use vantage_core::{Board, Color};

use crate::eval::score::{S, Score};

/// Awarded to a side that has castled or otherwise given up both castling rights.
pub const CASTLED_OR_COMMITTED_BONUS: Score = S(20, 20);

/// King safety from White's perspective.
pub fn evaluate_king_safety(board: &Board) -> Score {
    let rights = board.castling();
    let mut score = Score::ZERO;
    if !rights.has_any(Color::White) {
        score += CASTLED_OR_COMMITTED_BONUS;
    }
    if !rights.has_any(Color::Black) {
        score -= CASTLED_OR_COMMITTED_BONUS;
    }
    score
}
