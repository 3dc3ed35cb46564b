//! Castling rights and castling geometry.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::color::Color;
use crate::error::FenError;
use crate::square::Square;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CastleSide {
    Short,
    Long,
}

/// Four castling flags: bit 0 = `K`, 1 = `Q`, 2 = `k`, 3 = `q`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastleRights(u8);

impl CastleRights {
    pub const NONE: CastleRights = CastleRights(0);
    pub const ALL: CastleRights = CastleRights(0b1111);

    pub const WHITE_SHORT: CastleRights = CastleRights(0b0001);
    pub const WHITE_LONG: CastleRights = CastleRights(0b0010);
    pub const BLACK_SHORT: CastleRights = CastleRights(0b0100);
    pub const BLACK_LONG: CastleRights = CastleRights(0b1000);

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn insert(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 | other.0)
    }

    #[inline]
    pub const fn remove(self, other: CastleRights) -> CastleRights {
        CastleRights(self.0 & !other.0)
    }

    #[inline]
    pub const fn has(self, color: Color, side: CastleSide) -> bool {
        self.0 & Self::flag(color, side).0 != 0
    }

    /// Whether `color` still holds either right.
    #[inline]
    pub const fn has_any(self, color: Color) -> bool {
        self.0 & Self::both(color).0 != 0
    }

    #[inline]
    pub const fn remove_color(self, color: Color) -> CastleRights {
        self.remove(Self::both(color))
    }

    /// Rights that survive a move touching `from` and `to`.
    ///
    /// Moving a king or rook off its home square, or capturing on a rook's
    /// home square, clears the matching flags.
    #[inline]
    pub const fn after_move(self, from: Square, to: Square) -> CastleRights {
        CastleRights(self.0 & REVOKE[from.index()] & REVOKE[to.index()])
    }

    const fn both(color: Color) -> CastleRights {
        match color {
            Color::White => CastleRights(0b0011),
            Color::Black => CastleRights(0b1100),
        }
    }

    const fn flag(color: Color, side: CastleSide) -> CastleRights {
        match (color, side) {
            (Color::White, CastleSide::Short) => Self::WHITE_SHORT,
            (Color::White, CastleSide::Long) => Self::WHITE_LONG,
            (Color::Black, CastleSide::Short) => Self::BLACK_SHORT,
            (Color::Black, CastleSide::Long) => Self::BLACK_LONG,
        }
    }

    /// Parse the FEN castling field (`KQkq` subset or `-`).
    pub fn from_fen(s: &str) -> Result<CastleRights, FenError> {
        if s == "-" {
            return Ok(CastleRights::NONE);
        }
        if s.is_empty() {
            return Err(FenError::InvalidCastling { found: s.to_string() });
        }

        let mut rights = CastleRights::NONE;
        for c in s.chars() {
            let flag = match c {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => return Err(FenError::InvalidCastling { found: s.to_string() }),
            };
            rights = rights.insert(flag);
        }
        Ok(rights)
    }

    pub fn to_fen(self) -> String {
        if self.is_empty() {
            return "-".to_string();
        }
        [('K', Self::WHITE_SHORT), ('Q', Self::WHITE_LONG), ('k', Self::BLACK_SHORT), ('q', Self::BLACK_LONG)]
            .iter()
            .filter(|(_, flag)| self.0 & flag.0 != 0)
            .map(|(c, _)| *c)
            .collect()
    }
}

impl fmt::Debug for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CastleRights({})", self.to_fen())
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

/// Per-square mask of rights that survive a piece leaving or landing there.
const REVOKE: [u8; 64] = {
    let mut table = [0b1111u8; 64];
    table[Square::A1.index()] = !CastleRights::WHITE_LONG.0 & 0b1111;
    table[Square::E1.index()] = !(CastleRights::WHITE_SHORT.0 | CastleRights::WHITE_LONG.0) & 0b1111;
    table[Square::H1.index()] = !CastleRights::WHITE_SHORT.0 & 0b1111;
    table[Square::A8.index()] = !CastleRights::BLACK_LONG.0 & 0b1111;
    table[Square::E8.index()] = !(CastleRights::BLACK_SHORT.0 | CastleRights::BLACK_LONG.0) & 0b1111;
    table[Square::H8.index()] = !CastleRights::BLACK_SHORT.0 & 0b1111;
    table
};

/// Fixed squares involved in one castling move.
#[derive(Debug, Clone, Copy)]
pub struct CastlePath {
    pub king_from: Square,
    pub king_to: Square,
    pub rook_from: Square,
    pub rook_to: Square,
    /// Squares between king and rook that must be empty.
    pub empty: Bitboard,
    /// Squares the king passes through (excluding its start) that must not be attacked.
    pub safe: [Square; 2],
}

impl CastlePath {
    pub const fn of(color: Color, side: CastleSide) -> CastlePath {
        let back = color.back_rank();
        match side {
            CastleSide::Short => CastlePath {
                king_from: Square::from_coords(4, back),
                king_to: Square::from_coords(6, back),
                rook_from: Square::from_coords(7, back),
                rook_to: Square::from_coords(5, back),
                empty: Bitboard::new(0b0110_0000 << (back * 8)),
                safe: [Square::from_coords(5, back), Square::from_coords(6, back)],
            },
            CastleSide::Long => CastlePath {
                king_from: Square::from_coords(4, back),
                king_to: Square::from_coords(2, back),
                rook_from: Square::from_coords(0, back),
                rook_to: Square::from_coords(3, back),
                empty: Bitboard::new(0b0000_1110 << (back * 8)),
                safe: [Square::from_coords(3, back), Square::from_coords(2, back)],
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fen_field_roundtrip() {
        for field in ["KQkq", "Kq", "k", "-", "KQ"] {
            assert_eq!(CastleRights::from_fen(field).unwrap().to_fen(), field);
        }
    }

    #[test]
    fn rejects_bad_characters() {
        assert!(CastleRights::from_fen("KX").is_err());
        assert!(CastleRights::from_fen("").is_err());
    }

    #[test]
    fn king_move_clears_both_flags() {
        let rights = CastleRights::ALL.after_move(Square::E1, Square::F1);
        assert!(!rights.has_any(Color::White));
        assert!(rights.has(Color::Black, CastleSide::Short));
        assert!(rights.has(Color::Black, CastleSide::Long));
    }

    #[test]
    fn rook_capture_clears_victim_flag() {
        let rights = CastleRights::ALL.after_move(Square::B4, Square::H8);
        assert!(!rights.has(Color::Black, CastleSide::Short));
        assert!(rights.has(Color::Black, CastleSide::Long));
        assert!(rights.has(Color::White, CastleSide::Short));
    }

    #[test]
    fn castle_paths() {
        let short = CastlePath::of(Color::White, CastleSide::Short);
        assert_eq!(short.king_to, Square::G1);
        assert_eq!(short.rook_from, Square::H1);
        assert_eq!(short.empty.count(), 2);

        let long = CastlePath::of(Color::Black, CastleSide::Long);
        assert_eq!(long.king_to, Square::C8);
        assert_eq!(long.rook_to, Square::D8);
        assert_eq!(long.empty.count(), 3);
        assert!(long.empty.contains(Square::B8));
    }
}
