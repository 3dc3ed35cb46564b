//! Pawn pushes, captures, promotions and en passant.

use crate::attacks::pawn_attacks;
use crate::bitboard::Bitboard;
use crate::board::Board;
use crate::chess_move::{Move, MoveKind, MoveList};
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

use super::mode::GenMode;

pub(super) fn gen_pawns<M: GenMode>(board: &Board, list: &mut MoveList) {
    let us = board.side_to_move();
    let them = !us;
    let pawns = board.pieces(us, PieceKind::Pawn);
    let enemy = board.occupancy(them);
    let empty = !board.occupied();
    let back = -us.forward();

    let (single, promo_rank, double_rank) = match us {
        Color::White => (pawns.north() & empty, Bitboard::RANK_8, Bitboard::rank(3)),
        Color::Black => (pawns.south() & empty, Bitboard::RANK_1, Bitboard::rank(4)),
    };

    // Promotions are generated in both modes.
    for to in single & promo_rank {
        push_promotions(list, to.offset(back), to, None);
    }

    if M::QUIETS {
        for to in single & !promo_rank {
            list.push(Move::new(to.offset(back), to, PieceKind::Pawn, MoveKind::Normal));
        }

        let pushed_twice = match us {
            Color::White => single.north(),
            Color::Black => single.south(),
        };
        let double = pushed_twice & empty & double_rank;
        for to in double {
            list.push(Move::new(to.offset(2 * back), to, PieceKind::Pawn, MoveKind::DoublePush));
        }
    }

    for from in pawns {
        for to in pawn_attacks(us, from) & enemy {
            let Some(victim) = board.kind_on(to) else { continue };
            if promo_rank.contains(to) {
                push_promotions(list, from, to, Some(victim));
            } else {
                list.push(Move::capture(from, to, PieceKind::Pawn, victim));
            }
        }
    }

    if let Some(ep) = board.en_passant() {
        // Pawns that could capture onto `ep` are those a pawn of the other colour on `ep` would attack.
        for from in pawn_attacks(them, ep) & pawns {
            list.push(Move {
                kind: MoveKind::EnPassant,
                ..Move::capture(from, ep, PieceKind::Pawn, PieceKind::Pawn)
            });
        }
    }
}

fn push_promotions(list: &mut MoveList, from: Square, to: Square, captured: Option<PieceKind>) {
    for kind in PieceKind::PROMOTIONS {
        list.push(Move::promotion(from, to, kind, captured));
    }
}
