//! Move records and move lists.

use std::cmp::Reverse;
use std::fmt;
use std::ops::Index;

use crate::piece::PieceKind;
use crate::square::Square;

/// How a move changes the board beyond lifting and dropping one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    Capture,
    DoublePush,
    EnPassant,
    CastleShort,
    CastleLong,
    Promotion,
    PromotionCapture,
}

/// A fully annotated move.
///
/// Identity is `(from, to, promotion)`: two moves compare equal when those
/// match, regardless of the annotations or the ordering `score`.
#[derive(Debug, Clone, Copy)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    /// The piece that moves (a pawn, for promotions).
    pub piece: PieceKind,
    /// The piece removed from the board; a pawn for en passant.
    pub captured: Option<PieceKind>,
    pub kind: MoveKind,
    pub promotion: Option<PieceKind>,
    /// Ordering key, only meaningful inside move ordering.
    pub score: i32,
}

impl Move {
    /// Placeholder for "no move". Never produced by the generator.
    pub const NULL: Move = Move {
        from: Square::A1,
        to: Square::A1,
        piece: PieceKind::Pawn,
        captured: None,
        kind: MoveKind::Normal,
        promotion: None,
        score: 0,
    };

    #[inline]
    pub const fn new(from: Square, to: Square, piece: PieceKind, kind: MoveKind) -> Move {
        Move { from, to, piece, captured: None, kind, promotion: None, score: 0 }
    }

    #[inline]
    pub const fn capture(from: Square, to: Square, piece: PieceKind, captured: PieceKind) -> Move {
        Move {
            from,
            to,
            piece,
            captured: Some(captured),
            kind: MoveKind::Capture,
            promotion: None,
            score: 0,
        }
    }

    /// A pawn promotion, capturing if `captured` is set.
    #[inline]
    pub const fn promotion(
        from: Square,
        to: Square,
        promote_to: PieceKind,
        captured: Option<PieceKind>,
    ) -> Move {
        let kind = if captured.is_some() { MoveKind::PromotionCapture } else { MoveKind::Promotion };
        Move {
            from,
            to,
            piece: PieceKind::Pawn,
            captured,
            kind,
            promotion: Some(promote_to),
            score: 0,
        }
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.from == self.to
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub const fn is_castle(self) -> bool {
        matches!(self.kind, MoveKind::CastleShort | MoveKind::CastleLong)
    }

    /// Neither a capture nor a promotion.
    #[inline]
    pub const fn is_quiet(self) -> bool {
        !self.is_capture() && !self.is_promotion()
    }

    /// Coordinate text such as `e2e4` or `e7e8q`.
    pub fn to_uci(self) -> String {
        self.to_string()
    }
}

impl PartialEq for Move {
    fn eq(&self, other: &Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl Eq for Move {}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.fen_char())?;
        }
        Ok(())
    }
}

/// Room reserved up front. Legal positions have at most 218 legal moves; the
/// list still grows past this for constructed positions instead of dropping moves.
pub const MOVE_LIST_CAPACITY: usize = 256;

/// Ordered, growable list of moves.
#[derive(Debug, Clone)]
pub struct MoveList {
    moves: Vec<Move>,
}

impl MoveList {
    pub fn new() -> Self {
        Self { moves: Vec::with_capacity(MOVE_LIST_CAPACITY) }
    }

    #[inline]
    pub fn push(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn contains(&self, mv: Move) -> bool {
        self.moves.contains(&mv)
    }

    /// Stable sort, highest `score` first.
    pub fn sort_by_score(&mut self) {
        self.moves.sort_by_key(|mv| Reverse(mv.score));
    }

    pub fn retain(&mut self, keep: impl FnMut(&Move) -> bool) {
        self.moves.retain(keep);
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, i: usize) -> &Move {
        &self.moves[i]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn equality_ignores_annotations_and_score() {
        let a = Move::new(sq("e2"), sq("e4"), PieceKind::Pawn, MoveKind::DoublePush);
        let mut b = Move::new(sq("e2"), sq("e4"), PieceKind::Queen, MoveKind::Normal);
        b.score = 1234;
        assert_eq!(a, b);
    }

    #[test]
    fn promotion_piece_is_part_of_identity() {
        let q = Move::promotion(sq("e7"), sq("e8"), PieceKind::Queen, None);
        let n = Move::promotion(sq("e7"), sq("e8"), PieceKind::Knight, None);
        assert_ne!(q, n);
        assert_eq!(q.kind, MoveKind::Promotion);
        let qc = Move::promotion(sq("e7"), sq("d8"), PieceKind::Queen, Some(PieceKind::Rook));
        assert_eq!(qc.kind, MoveKind::PromotionCapture);
        assert!(qc.is_capture() && qc.is_promotion() && !qc.is_quiet());
    }

    #[test]
    fn coordinate_text() {
        assert_eq!(Move::new(sq("g1"), sq("f3"), PieceKind::Knight, MoveKind::Normal).to_uci(), "g1f3");
        assert_eq!(Move::promotion(sq("a2"), sq("a1"), PieceKind::Rook, None).to_uci(), "a2a1r");
        assert_eq!(Move::NULL.to_uci(), "0000");
    }

    #[test]
    fn sort_is_descending_and_stable() {
        let mut list = MoveList::new();
        for (i, score) in [10, 50, 10, 70].into_iter().enumerate() {
            let mut mv = Move::new(Square::A1, Square::new(i as u8 + 1).unwrap(), PieceKind::Rook, MoveKind::Normal);
            mv.score = score;
            list.push(mv);
        }
        list.sort_by_score();
        let order: Vec<usize> = list.iter().map(|m| m.to.index()).collect();
        assert_eq!(order, vec![4, 2, 1, 3]);
    }

    #[test]
    fn list_grows_past_reserved_capacity() {
        let mut list = MoveList::new();
        for _ in 0..MOVE_LIST_CAPACITY + 10 {
            list.push(Move::NULL);
        }
        assert_eq!(list.len(), MOVE_LIST_CAPACITY + 10);
    }
}
