//! Knight, bishop, rook, queen and king moves, plus castling.

use crate::attacks::piece_attacks;
use crate::board::Board;
use crate::castle_rights::{CastlePath, CastleSide};
use crate::chess_move::{Move, MoveKind, MoveList};
use crate::piece::PieceKind;

use super::mode::GenMode;

const JUMPERS_AND_SLIDERS: [PieceKind; 5] = [
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

pub(super) fn gen_pieces<M: GenMode>(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let occupied = board.occupied();
    let enemy = board.occupancy(!us);
    let targets = if M::QUIETS { !board.occupancy(us) } else { enemy };

    for kind in JUMPERS_AND_SLIDERS {
        for from in board.pieces(us, kind) {
            for to in piece_attacks(kind, from, occupied) & targets {
                match board.kind_on(to) {
                    Some(victim) => list.push(Move::capture(from, to, kind, victim)),
                    None => list.push(Move::new(from, to, kind, MoveKind::Normal)),
                }
            }
        }
    }
}

/// Castling moves whose right is currently available.
pub(super) fn gen_castles(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    for (side, kind) in [(CastleSide::Short, MoveKind::CastleShort), (CastleSide::Long, MoveKind::CastleLong)] {
        if board.can_castle(us, side) {
            let path = CastlePath::of(us, side);
            list.push(Move::new(path.king_from, path.king_to, PieceKind::King, kind));
        }
    }
}
