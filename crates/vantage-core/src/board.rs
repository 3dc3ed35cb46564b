//! Bitboard position: twelve piece sets, two colour unions and game state.

use std::fmt;

use crate::bitboard::Bitboard;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::BoardError;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use crate::zobrist;

/// FEN of the standard initial position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// A chess position.
///
/// Every change to a piece set goes through `add`, `lift`
/// or `shift`, which update the piece set, the colour union and the
/// Zobrist hash together. `hash` therefore always equals
/// [`zobrist::hash_from_scratch`] between public calls.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Board {
    pieces: [[Bitboard; PieceKind::COUNT]; Color::COUNT],
    occupancy: [Bitboard; Color::COUNT],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastleRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u16,
    pub(crate) fullmove_number: u16,
    pub(crate) hash: u64,
}

impl Board {
    /// A board with no pieces, White to move and no castling rights.
    pub fn empty() -> Board {
        Board {
            pieces: [[Bitboard::EMPTY; PieceKind::COUNT]; Color::COUNT],
            occupancy: [Bitboard::EMPTY; Color::COUNT],
            side_to_move: Color::White,
            castling: CastleRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
            hash: zobrist::castling(CastleRights::NONE.bits()),
        }
    }

    pub fn starting_position() -> Board {
        let mut board = Board::empty();
        for (file, &kind) in BACK_RANK.iter().enumerate() {
            let file = file as u8;
            board.add(Color::White, kind, Square::from_coords(file, 0));
            board.add(Color::White, PieceKind::Pawn, Square::from_coords(file, 1));
            board.add(Color::Black, PieceKind::Pawn, Square::from_coords(file, 6));
            board.add(Color::Black, kind, Square::from_coords(file, 7));
        }
        board.set_castling(CastleRights::ALL);
        board
    }

    #[inline]
    pub fn pieces(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces[color.index()][kind.index()]
    }

    /// Union of all pieces of `color`.
    #[inline]
    pub fn occupancy(&self, color: Color) -> Bitboard {
        self.occupancy[color.index()]
    }

    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.occupancy[0] | self.occupancy[1]
    }

    #[inline]
    pub fn is_occupied(&self, sq: Square) -> bool {
        self.occupied().contains(sq)
    }

    pub fn color_on(&self, sq: Square) -> Option<Color> {
        Color::ALL.into_iter().find(|&c| self.occupancy(c).contains(sq))
    }

    pub fn kind_on(&self, sq: Square) -> Option<PieceKind> {
        let color = self.color_on(sq)?;
        PieceKind::ALL.into_iter().find(|&k| self.pieces(color, k).contains(sq))
    }

    pub fn piece_on(&self, sq: Square) -> Option<Piece> {
        let color = self.color_on(sq)?;
        let kind = PieceKind::ALL.into_iter().find(|&k| self.pieces(color, k).contains(sq))?;
        Some(Piece::new(color, kind))
    }

    /// The king of `color`, or `None` on a board under construction that has none.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces(color, PieceKind::King).lsb()
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastleRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Zobrist signature of the position.
    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Whether `color` has anything besides pawns and the king.
    pub fn has_non_pawn_material(&self, color: Color) -> bool {
        let pawns_and_king = self.pieces(color, PieceKind::Pawn) | self.pieces(color, PieceKind::King);
        (self.occupancy(color) & !pawns_and_king).is_nonempty()
    }

    /// Place `piece` on an empty square.
    pub fn put_piece(&mut self, piece: Piece, sq: Square) -> Result<(), BoardError> {
        if self.is_occupied(sq) {
            return Err(BoardError::SquareOccupied { square: sq });
        }
        self.add(piece.color, piece.kind, sq);
        Ok(())
    }

    /// Take whatever stands on `sq` off the board.
    pub fn remove_piece(&mut self, sq: Square) -> Result<Piece, BoardError> {
        let piece = self.piece_on(sq).ok_or(BoardError::SquareEmpty { square: sq })?;
        self.lift(piece.color, piece.kind, sq);
        Ok(piece)
    }

    /// Move the piece on `from` to the empty square `to`. No chess rules are applied.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<(), BoardError> {
        let piece = self.piece_on(from).ok_or(BoardError::SquareEmpty { square: from })?;
        if self.is_occupied(to) {
            return Err(BoardError::SquareOccupied { square: to });
        }
        self.shift(piece.color, piece.kind, from, to);
        Ok(())
    }

    #[inline]
    pub(crate) fn add(&mut self, color: Color, kind: PieceKind, sq: Square) {
        debug_assert!(!self.is_occupied(sq), "add onto occupied {sq}");
        let bb = sq.bitboard();
        self.pieces[color.index()][kind.index()] |= bb;
        self.occupancy[color.index()] |= bb;
        self.hash ^= zobrist::piece_square(Piece::new(color, kind), sq);
    }

    #[inline]
    pub(crate) fn lift(&mut self, color: Color, kind: PieceKind, sq: Square) {
        debug_assert!(self.pieces(color, kind).contains(sq), "lift missing {kind} on {sq}");
        let bb = sq.bitboard();
        self.pieces[color.index()][kind.index()] ^= bb;
        self.occupancy[color.index()] ^= bb;
        self.hash ^= zobrist::piece_square(Piece::new(color, kind), sq);
    }

    #[inline]
    pub(crate) fn shift(&mut self, color: Color, kind: PieceKind, from: Square, to: Square) {
        debug_assert!(self.pieces(color, kind).contains(from), "shift missing {kind} on {from}");
        let bb = from.bitboard() | to.bitboard();
        self.pieces[color.index()][kind.index()] ^= bb;
        self.occupancy[color.index()] ^= bb;
        let piece = Piece::new(color, kind);
        self.hash ^= zobrist::piece_square(piece, from) ^ zobrist::piece_square(piece, to);
    }

    pub(crate) fn set_castling(&mut self, rights: CastleRights) {
        self.hash ^= zobrist::castling(self.castling.bits()) ^ zobrist::castling(rights.bits());
        self.castling = rights;
    }

    pub(crate) fn set_en_passant(&mut self, sq: Option<Square>) {
        if let Some(old) = self.en_passant {
            self.hash ^= zobrist::en_passant_file(old.file());
        }
        if let Some(new) = sq {
            self.hash ^= zobrist::en_passant_file(new.file());
        }
        self.en_passant = sq;
    }

    pub(crate) fn set_side_to_move(&mut self, color: Color) {
        if color != self.side_to_move {
            self.hash ^= zobrist::side_to_move();
            self.side_to_move = color;
        }
    }

    /// Check structural sanity: one king each, no pawns on the back ranks,
    /// disjoint piece sets, matching unions, the side that just moved not in
    /// check, and an en-passant square that sits behind a pawn.
    pub fn validate(&self) -> Result<(), BoardError> {
        for color in Color::ALL {
            let count = self.pieces(color, PieceKind::King).count();
            if count != 1 {
                return Err(BoardError::InvalidKingCount { color, count });
            }
        }

        let pawns = self.pieces(Color::White, PieceKind::Pawn) | self.pieces(Color::Black, PieceKind::Pawn);
        if (pawns & (Bitboard::RANK_1 | Bitboard::RANK_8)).is_nonempty() {
            return Err(BoardError::PawnsOnBackRank);
        }

        let mut seen = Bitboard::EMPTY;
        for color in Color::ALL {
            let mut union = Bitboard::EMPTY;
            for kind in PieceKind::ALL {
                let set = self.pieces(color, kind);
                if (seen & set).is_nonempty() {
                    return Err(BoardError::OverlappingPieces);
                }
                seen |= set;
                union |= set;
            }
            if union != self.occupancy(color) {
                return Err(BoardError::InconsistentOccupancy);
            }
        }

        if self.in_check(!self.side_to_move) {
            return Err(BoardError::OpponentInCheck);
        }

        if let Some(ep) = self.en_passant {
            let mover = !self.side_to_move;
            let expected_rank = if mover == Color::White { 2 } else { 5 };
            // Rank first: the pawn square is only on the board for ranks 3 and 6.
            if ep.rank() != expected_rank
                || self.is_occupied(ep)
                || !self.pieces(mover, PieceKind::Pawn).contains(ep.offset(mover.forward()))
            {
                return Err(BoardError::BadEnPassant { square: ep });
            }
        }

        Ok(())
    }

    /// A printable 8x8 diagram.
    pub fn pretty(&self) -> PrettyBoard<'_> {
        PrettyBoard(self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::starting_position()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board(\"{}\")", self)
    }
}

pub struct PrettyBoard<'a>(&'a Board);

impl fmt::Display for PrettyBoard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let board = self.0;
        for rank in (0u8..8).rev() {
            write!(f, "{}  ", rank + 1)?;
            for file in 0u8..8 {
                let c = board
                    .piece_on(Square::from_coords(file, rank))
                    .map_or('.', Piece::fen_char);
                if file < 7 {
                    write!(f, "{c} ")?;
                } else {
                    write!(f, "{c}")?;
                }
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}
