//! Material balance with a bishop-pair bonus, from White's point of view.

use vantage_core::{Board, Color, PieceKind};

use crate::eval::score::{S, Score};

/// Piece values indexed by [`PieceKind::index()`]. Kings always cancel out.
pub const MATERIAL_VALUE: [Score; PieceKind::COUNT] = [
    S(100, 110), // Pawn
    S(320, 320), // Knight
    S(330, 330), // Bishop
    S(500, 500), // Rook
    S(900, 900), // Queen
    S(0, 0),     // King
];

pub const BISHOP_PAIR_BONUS: Score = S(50, 50);

pub fn material(board: &Board) -> Score {
    let mut score = Score::ZERO;

    for kind in PieceKind::ALL {
        let white = board.pieces(Color::White, kind).count() as i16;
        let black = board.pieces(Color::Black, kind).count() as i16;
        score += MATERIAL_VALUE[kind.index()] * (white - black);
    }

    if board.pieces(Color::White, PieceKind::Bishop).count() >= 2 {
        score += BISHOP_PAIR_BONUS;
    }
    if board.pieces(Color::Black, PieceKind::Bishop).count() >= 2 {
        score -= BISHOP_PAIR_BONUS;
    }

    score
}
