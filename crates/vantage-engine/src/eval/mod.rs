//! Static evaluation.
//!
//! Every term is computed from White's point of view as a packed
//! middlegame/endgame [`Score`]; the sum is tapered by [`game_phase`] and the
//! sign flipped for Black exactly once, here.

pub mod king_safety;
pub mod material;
pub mod mobility;
pub mod pawns;
pub mod phase;
pub mod pst;
pub mod score;

use vantage_core::{Board, Color};

use king_safety::evaluate_king_safety;
use material::material;
use mobility::evaluate_mobility;
use pawns::evaluate_pawns;
pub use phase::{MAX_PHASE, game_phase};
use pst::piece_squares;
pub use score::{S, Score};

/// Sum of all terms from White's point of view, before tapering.
pub fn evaluate_terms(board: &Board) -> Score {
    material(board)
        + piece_squares(board)
        + evaluate_pawns(board)
        + evaluate_mobility(board)
        + evaluate_king_safety(board)
}

/// Centipawn score for the side to move.
pub fn evaluate(board: &Board) -> i32 {
    let white = evaluate_terms(board).taper(game_phase(board));
    match board.side_to_move() {
        Color::White => white,
        Color::Black => -white,
    }
}
