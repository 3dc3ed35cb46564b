//! Game phase from the heavy pieces left on the board.

use vantage_core::{Board, Color, PieceKind};

/// Phase of a position with both queens and at least three rooks.
pub const MAX_PHASE: i32 = 256;

/// Phase coefficient in `0..=MAX_PHASE`.
///
/// Both queens plus three or more rooks is a full middlegame. No queens, or a
/// single queen with at most two rooks, is a pure endgame. Anything between
/// scales with `2 * queens + rooks` out of the starting 8 and never reaches
/// either end.
pub fn game_phase(board: &Board) -> i32 {
    let count = |kind| -> i32 {
        Color::ALL
            .into_iter()
            .map(|c| board.pieces(c, kind).count() as i32)
            .sum()
    };
    let queens = count(PieceKind::Queen);
    let rooks = count(PieceKind::Rook);

    if queens >= 2 && rooks >= 3 {
        return MAX_PHASE;
    }
    if queens == 0 || (queens == 1 && rooks <= 2) {
        return 0;
    }
    ((2 * queens + rooks) * MAX_PHASE / 8).clamp(1, MAX_PHASE - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(fen: &str) -> i32 {
        game_phase(&fen.parse().unwrap())
    }

    #[test]
    fn starting_position_is_full_middlegame() {
        assert_eq!(game_phase(&Board::starting_position()), MAX_PHASE);
        assert_eq!(phase("r3k3/8/8/8/8/8/8/RQ1QK2R w - - 0 1"), MAX_PHASE);
    }

    #[test]
    fn queenless_and_thin_positions_are_endgames() {
        assert_eq!(phase("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1"), 0);
        assert_eq!(phase("3qk3/8/8/8/8/8/8/R3K2R w - - 0 1"), 0);
        assert_eq!(phase("4k3/8/8/8/8/8/8/4K3 w - - 0 1"), 0);
    }

    #[test]
    fn in_between_positions_scale() {
        // Two queens, two rooks: (4 + 2) * 256 / 8.
        assert_eq!(phase("r2qk3/8/8/8/8/8/8/3QK2R w - - 0 1"), 192);
        // One queen, three rooks: (2 + 3) * 256 / 8.
        assert_eq!(phase("r2qk2r/8/8/8/8/8/8/4K2R w - - 0 1"), 160);
    }
}
