//! Zobrist keys and from-scratch position hashing.

use crate::board::Board;
use crate::color::Color;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;

const SEED: u64 = 0x7661_6e74_6167_6521;

const PIECE_KEYS: usize = 12 * 64;
const TOTAL_KEYS: usize = PIECE_KEYS + 1 + 16 + 8;

/// Xorshift64 step: returns the next state, which doubles as the output.
const fn xorshift64(mut state: u64) -> u64 {
    state ^= state << 13;
    state ^= state >> 7;
    state ^= state << 17;
    state
}

/// Every key in one stream: piece-squares, side, castling masks, en-passant files.
static KEYS: [u64; TOTAL_KEYS] = {
    let mut keys = [0u64; TOTAL_KEYS];
    let mut state = SEED;
    let mut i = 0;
    while i < TOTAL_KEYS {
        state = xorshift64(state);
        keys[i] = state;
        i += 1;
    }
    keys
};

#[inline]
pub(crate) fn piece_square(piece: Piece, sq: Square) -> u64 {
    KEYS[piece.index() * 64 + sq.index()]
}

/// XORed in when Black is to move.
#[inline]
pub(crate) fn side_to_move() -> u64 {
    KEYS[PIECE_KEYS]
}

/// One key per castling-rights mask (0..16).
#[inline]
pub(crate) fn castling(bits: u8) -> u64 {
    KEYS[PIECE_KEYS + 1 + bits as usize]
}

#[inline]
pub(crate) fn en_passant_file(file: u8) -> u64 {
    KEYS[PIECE_KEYS + 17 + file as usize]
}

/// Hash every occupied square, the side to move, the castling mask and the
/// en-passant file.
pub fn hash_from_scratch(board: &Board) -> u64 {
    let mut hash = 0u64;

    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for sq in board.pieces(color, kind) {
                hash ^= piece_square(Piece::new(color, kind), sq);
            }
        }
    }

    if board.side_to_move() == Color::Black {
        hash ^= side_to_move();
    }

    hash ^= castling(board.castling().bits());

    if let Some(ep) = board.en_passant() {
        hash ^= en_passant_file(ep.file());
    }

    hash
}
