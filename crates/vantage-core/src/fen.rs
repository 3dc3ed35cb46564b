//! FEN import and export for [`Board`].

use std::fmt;
use std::str::FromStr;

use crate::board::Board;
use crate::castle_rights::CastleRights;
use crate::color::Color;
use crate::error::FenError;
use crate::piece::Piece;
use crate::square::Square;

impl FromStr for Board {
    type Err = FenError;

    /// Parse a FEN record.
    ///
    /// The four-field form without move counters is accepted and defaults to
    /// `0 1`. The board is built on a scratch value and only returned once it
    /// validates, so a failed parse never yields a half-applied position.
    fn from_str(fen: &str) -> Result<Board, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() != 6 && fields.len() != 4 {
            return Err(FenError::WrongFieldCount { found: fields.len() });
        }

        let mut board = Board::empty();
        parse_placement(&mut board, fields[0])?;

        let side = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidSideToMove { found: other.to_string() }),
        };
        board.set_side_to_move(side);
        board.set_castling(CastleRights::from_fen(fields[2])?);

        let en_passant = match fields[3] {
            "-" => None,
            text => Some(
                text.parse::<Square>()
                    .map_err(|_| FenError::InvalidEnPassant { found: text.to_string() })?,
            ),
        };
        board.set_en_passant(en_passant);

        if fields.len() == 6 {
            board.halfmove_clock = parse_counter(fields[4], "halfmove clock")?;
            board.fullmove_number = parse_counter(fields[5], "fullmove number")?;
        }

        board.validate()?;
        Ok(board)
    }
}

fn parse_placement(board: &mut Board, placement: &str) -> Result<(), FenError> {
    let rows: Vec<&str> = placement.split('/').collect();
    if rows.len() != 8 {
        return Err(FenError::WrongRankCount { found: rows.len() });
    }

    for (row, text) in rows.iter().enumerate() {
        let rank = 7 - row as u8;
        let mut file = 0usize;
        for c in text.chars() {
            match c {
                '1'..='8' => file += c as usize - '0' as usize,
                _ => {
                    let piece = Piece::from_fen_char(c).ok_or(FenError::InvalidPieceChar { character: c })?;
                    if file >= 8 {
                        return Err(FenError::BadRankLength { rank: rank as usize + 1, length: file + 1 });
                    }
                    board.add(piece.color, piece.kind, Square::from_coords(file as u8, rank));
                    file += 1;
                }
            }
        }
        if file != 8 {
            return Err(FenError::BadRankLength { rank: rank as usize + 1, length: file });
        }
    }
    Ok(())
}

fn parse_counter(text: &str, field: &'static str) -> Result<u16, FenError> {
    text.parse().map_err(|_| FenError::InvalidCounter { field, found: text.to_string() })
}

impl Board {
    /// Six-field FEN of this position.
    pub fn to_fen(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0u8..8).rev() {
            let mut empty = 0;
            for file in 0u8..8 {
                match self.piece_on(Square::from_coords(file, rank)) {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{}", piece.fen_char())?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if rank > 0 {
                f.write_str("/")?;
            }
        }

        write!(f, " {} {} ", self.side_to_move, self.castling)?;
        match self.en_passant {
            Some(sq) => write!(f, "{sq}")?,
            None => f.write_str("-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}
