//! Pseudo-legal move generation.
//!
//! The generators emit every move that obeys piece movement rules, with
//! castling already checked for an empty path and unattacked transit squares.
//! Whether a move leaves the mover's own king in check is decided afterwards,
//! either by [`is_legal`] or by the caller after `make_move`.

mod mode;
mod notation;
mod pawns;
mod pieces;

use crate::board::Board;
use crate::chess_move::{Move, MoveList};

use mode::{AllMoves, CapturesOnly};
use pawns::gen_pawns;
use pieces::{gen_castles, gen_pieces};

pub use notation::parse_uci_move;

/// Append every pseudo-legal move for the side to move.
pub fn generate_moves(board: &Board, list: &mut MoveList) {
    gen_pawns::<AllMoves>(board, list);
    gen_pieces::<AllMoves>(board, list);
    gen_castles(board, list);
}

/// Append captures and promotions only.
pub fn generate_captures(board: &Board, list: &mut MoveList) {
    gen_pawns::<CapturesOnly>(board, list);
    gen_pieces::<CapturesOnly>(board, list);
}

/// True if playing `mv` does not leave the mover's king attacked.
///
/// `mv` must come from the generator for `board`.
pub fn is_legal(board: &Board, mv: Move) -> bool {
    let mut scratch = *board;
    let us = scratch.side_to_move();
    scratch.make_move(mv);
    !scratch.in_check(us)
}

/// Every legal move for the side to move.
pub fn legal_moves(board: &Board) -> MoveList {
    let mut list = MoveList::new();
    generate_moves(board, &mut list);
    list.retain(|mv| is_legal(board, *mv));
    list
}
