//! Errors for FEN import, position validation and move submission.

use std::fmt;

use crate::color::Color;
use crate::square::Square;

/// Reasons a FEN string is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    WrongFieldCount {
        found: usize,
    },
    WrongRankCount {
        found: usize,
    },
    /// A rank describes more or fewer than 8 squares. `rank` is 8 for the first
    /// rank written, 1 for the last.
    BadRankLength {
        rank: usize,
        length: usize,
    },
    InvalidPieceChar {
        character: char,
    },
    InvalidSideToMove {
        found: String,
    },
    InvalidCastling {
        found: String,
    },
    InvalidEnPassant {
        found: String,
    },
    InvalidCounter {
        field: &'static str,
        found: String,
    },
    InvalidBoard {
        source: BoardError,
    },
}

impl fmt::Display for FenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenError::WrongFieldCount { found } => {
                write!(f, "expected 6 FEN fields, found {found}")
            }
            FenError::WrongRankCount { found } => {
                write!(f, "expected 8 ranks in piece placement, found {found}")
            }
            FenError::BadRankLength { rank, length } => {
                write!(f, "rank {rank} describes {length} squares, expected 8")
            }
            FenError::InvalidPieceChar { character } => {
                write!(f, "invalid piece character: '{character}'")
            }
            FenError::InvalidSideToMove { found } => {
                write!(f, "invalid side to move: \"{found}\"")
            }
            FenError::InvalidCastling { found } => {
                write!(f, "invalid castling field: \"{found}\"")
            }
            FenError::InvalidEnPassant { found } => {
                write!(f, "invalid en passant square: \"{found}\"")
            }
            FenError::InvalidCounter { field, found } => {
                write!(f, "invalid {field}: \"{found}\"")
            }
            FenError::InvalidBoard { source } => {
                write!(f, "invalid board: {source}")
            }
        }
    }
}

impl std::error::Error for FenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FenError::InvalidBoard { source } => Some(source),
            _ => None,
        }
    }
}

impl From<BoardError> for FenError {
    fn from(source: BoardError) -> Self {
        FenError::InvalidBoard { source }
    }
}

/// Structural problems found by [`Board::validate`](crate::Board::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("{color:?} has {count} kings, expected 1")]
    InvalidKingCount { color: Color, count: u32 },

    #[error("pawns on first or eighth rank")]
    PawnsOnBackRank,

    #[error("two pieces share a square")]
    OverlappingPieces,

    #[error("occupancy does not match piece sets")]
    InconsistentOccupancy,

    #[error("side not to move is in check")]
    OpponentInCheck,

    #[error("en passant square {square} is not behind a double-pushed pawn")]
    BadEnPassant { square: Square },

    #[error("{square} is already occupied")]
    SquareOccupied { square: Square },

    #[error("{square} is empty")]
    SquareEmpty { square: Square },
}

/// Reasons a submitted move is rejected. The position is never modified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("malformed move text \"{text}\"")]
    Malformed { text: String },

    #[error("no piece on {square}")]
    EmptySource { square: Square },

    #[error("piece on {square} does not belong to the side to move")]
    WrongColor { square: Square },

    #[error("{text} is not a move in this position")]
    NotPseudoLegal { text: String },

    #[error("{text} leaves the king in check")]
    LeavesKingInCheck { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn fen_error_messages() {
        assert_eq!(
            FenError::WrongFieldCount { found: 3 }.to_string(),
            "expected 6 FEN fields, found 3"
        );
        assert_eq!(
            FenError::InvalidPieceChar { character: 'x' }.to_string(),
            "invalid piece character: 'x'"
        );
        assert_eq!(
            FenError::InvalidCounter { field: "halfmove clock", found: "abc".into() }.to_string(),
            "invalid halfmove clock: \"abc\""
        );
    }

    #[test]
    fn board_error_is_the_source() {
        let err: FenError = BoardError::PawnsOnBackRank.into();
        assert_eq!(err.to_string(), "invalid board: pawns on first or eighth rank");
        assert!(err.source().is_some());
    }

    #[test]
    fn move_error_messages() {
        let err = MoveError::EmptySource { square: Square::E4 };
        assert_eq!(err.to_string(), "no piece on e4");
        let err = MoveError::LeavesKingInCheck { text: "e1e2".into() };
        assert_eq!(err.to_string(), "e1e2 leaves the king in check");
    }
}
