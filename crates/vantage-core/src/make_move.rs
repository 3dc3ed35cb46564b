//! Attack detection, castling availability and in-place make/unmake.

use crate::attacks::{bishop_attacks, king_attacks, knight_attacks, pawn_attacks, rook_attacks};
use crate::board::Board;
use crate::castle_rights::{CastlePath, CastleRights, CastleSide};
use crate::chess_move::{Move, MoveKind};
use crate::color::Color;
use crate::piece::PieceKind;
use crate::square::Square;

/// State a move destroys and its inverse must put back.
///
/// Returned by [`Board::make_move`] and consumed by [`Board::unmake_move`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Undo {
    pub castling: CastleRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u16,
    pub fullmove_number: u16,
    pub captured: Option<PieceKind>,
    pub hash: u64,
}

impl Board {
    /// Whether any piece of `by` attacks `sq`.
    ///
    /// Each piece type is checked by casting its attack pattern from `sq` and
    /// intersecting with `by`'s pieces of that type; sliders stop at the first
    /// occupied square.
    pub fn is_square_attacked(&self, sq: Square, by: Color) -> bool {
        let occupied = self.occupied();

        // A pawn of `by` on X attacks `sq` iff a pawn of the other colour on `sq` would attack X.
        if (pawn_attacks(!by, sq) & self.pieces(by, PieceKind::Pawn)).is_nonempty() {
            return true;
        }
        if (knight_attacks(sq) & self.pieces(by, PieceKind::Knight)).is_nonempty() {
            return true;
        }
        if (king_attacks(sq) & self.pieces(by, PieceKind::King)).is_nonempty() {
            return true;
        }

        let queens = self.pieces(by, PieceKind::Queen);
        let diagonal = self.pieces(by, PieceKind::Bishop) | queens;
        if (bishop_attacks(sq, occupied) & diagonal).is_nonempty() {
            return true;
        }
        let straight = self.pieces(by, PieceKind::Rook) | queens;
        (rook_attacks(sq, occupied) & straight).is_nonempty()
    }

    /// Whether `color`'s king is attacked. A side without a king is never in check.
    pub fn in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, !color))
    }

    /// Whether `color` may castle towards `side` right now: the right is held,
    /// the king is not in check, the squares between king and rook are empty
    /// and the squares the king crosses are not attacked.
    pub fn can_castle(&self, color: Color, side: CastleSide) -> bool {
        if !self.castling.has(color, side) {
            return false;
        }
        let path = CastlePath::of(color, side);
        if !self.pieces(color, PieceKind::King).contains(path.king_from)
            || !self.pieces(color, PieceKind::Rook).contains(path.rook_from)
        {
            return false;
        }
        if (self.occupied() & path.empty).is_nonempty() {
            return false;
        }
        if self.is_square_attacked(path.king_from, !color) {
            return false;
        }
        path.safe.iter().all(|&sq| !self.is_square_attacked(sq, !color))
    }

    /// Apply a pseudo-legal move in place and return the token that undoes it.
    ///
    /// The move must come from the generator (or [`parse_uci_move`](crate::parse_uci_move))
    /// for this exact position. Legality is not checked: callers test
    /// `in_check(mover)` afterwards and unmake if it is set.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let us = self.side_to_move;
        let them = !us;
        let undo = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: mv.captured,
            hash: self.hash,
        };

        self.set_en_passant(None);
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);

        match mv.kind {
            MoveKind::Normal => self.shift(us, mv.piece, mv.from, mv.to),
            MoveKind::Capture => {
                if let Some(victim) = mv.captured {
                    self.lift(them, victim, mv.to);
                }
                self.shift(us, mv.piece, mv.from, mv.to);
            }
            MoveKind::DoublePush => {
                self.shift(us, PieceKind::Pawn, mv.from, mv.to);
                self.set_en_passant(Some(mv.from.offset(us.forward())));
            }
            MoveKind::EnPassant => {
                self.lift(them, PieceKind::Pawn, mv.to.offset(-us.forward()));
                self.shift(us, PieceKind::Pawn, mv.from, mv.to);
            }
            MoveKind::CastleShort => self.castle(us, CastleSide::Short, false),
            MoveKind::CastleLong => self.castle(us, CastleSide::Long, false),
            MoveKind::Promotion | MoveKind::PromotionCapture => {
                if let Some(victim) = mv.captured {
                    self.lift(them, victim, mv.to);
                }
                self.lift(us, PieceKind::Pawn, mv.from);
                self.add(us, mv.promotion.unwrap_or(PieceKind::Queen), mv.to);
            }
        }

        if mv.piece == PieceKind::Pawn || mv.captured.is_some() {
            self.halfmove_clock = 0;
        }

        let rights = self.castling.after_move(mv.from, mv.to);
        if rights != self.castling {
            self.set_castling(rights);
        }

        if us == Color::Black {
            self.fullmove_number = self.fullmove_number.saturating_add(1);
        }
        self.set_side_to_move(them);

        undo
    }

    /// Exact inverse of [`Board::make_move`] for the same `mv` and its `undo`.
    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        let us = !self.side_to_move;
        let them = self.side_to_move;
        self.side_to_move = us;

        match mv.kind {
            MoveKind::Normal | MoveKind::DoublePush => self.shift(us, mv.piece, mv.to, mv.from),
            MoveKind::Capture => {
                self.shift(us, mv.piece, mv.to, mv.from);
                if let Some(victim) = undo.captured {
                    self.add(them, victim, mv.to);
                }
            }
            MoveKind::EnPassant => {
                self.shift(us, PieceKind::Pawn, mv.to, mv.from);
                self.add(them, PieceKind::Pawn, mv.to.offset(-us.forward()));
            }
            MoveKind::CastleShort => self.castle(us, CastleSide::Short, true),
            MoveKind::CastleLong => self.castle(us, CastleSide::Long, true),
            MoveKind::Promotion | MoveKind::PromotionCapture => {
                self.lift(us, mv.promotion.unwrap_or(PieceKind::Queen), mv.to);
                self.add(us, PieceKind::Pawn, mv.from);
                if let Some(victim) = undo.captured {
                    self.add(them, victim, mv.to);
                }
            }
        }

        self.fullmove_number = undo.fullmove_number;
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    /// Pass the turn: flip the side to move and clear en passant.
    pub fn make_null_move(&mut self) -> Undo {
        let undo = Undo {
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            captured: None,
            hash: self.hash,
        };
        self.set_en_passant(None);
        self.halfmove_clock = self.halfmove_clock.saturating_add(1);
        self.set_side_to_move(!self.side_to_move);
        undo
    }

    pub fn unmake_null_move(&mut self, undo: Undo) {
        self.side_to_move = !self.side_to_move;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.hash = undo.hash;
    }

    fn castle(&mut self, color: Color, side: CastleSide, reverse: bool) {
        let path = CastlePath::of(color, side);
        if reverse {
            self.shift(color, PieceKind::King, path.king_to, path.king_from);
            self.shift(color, PieceKind::Rook, path.rook_to, path.rook_from);
        } else {
            self.shift(color, PieceKind::King, path.king_from, path.king_to);
            self.shift(color, PieceKind::Rook, path.rook_from, path.rook_to);
        }
    }
}
