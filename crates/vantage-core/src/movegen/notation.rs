//! Coordinate move text (`e2e4`, `e7e8q`) resolved against a position.

use crate::board::Board;
use crate::chess_move::{Move, MoveList};
use crate::error::MoveError;
use crate::piece::PieceKind;
use crate::square::Square;

use super::generate_moves;

/// Resolve coordinate text to the fully annotated pseudo-legal move it names.
///
/// The move is not checked for leaving the king in check; see
/// [`is_legal`](super::is_legal).
pub fn parse_uci_move(board: &Board, text: &str) -> Result<Move, MoveError> {
    let malformed = || MoveError::Malformed { text: text.to_string() };

    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(malformed());
    }
    let from: Square = text[0..2].parse().map_err(|_| malformed())?;
    let to: Square = text[2..4].parse().map_err(|_| malformed())?;
    let promotion = match text.as_bytes().get(4) {
        None => None,
        Some(&c) => match PieceKind::from_fen_char(c as char) {
            Some(kind) if PieceKind::PROMOTIONS.contains(&kind) => Some(kind),
            _ => return Err(malformed()),
        },
    };

    match board.color_on(from) {
        None => return Err(MoveError::EmptySource { square: from }),
        Some(color) if color != board.side_to_move() => {
            return Err(MoveError::WrongColor { square: from });
        }
        Some(_) => {}
    }

    let mut list = MoveList::new();
    generate_moves(board, &mut list);
    list.into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| MoveError::NotPseudoLegal { text: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess_move::MoveKind;

    #[test]
    fn annotates_moves_from_the_position() {
        let board = Board::starting_position();
        let mv = parse_uci_move(&board, "e2e4").unwrap();
        assert_eq!(mv.kind, MoveKind::DoublePush);
        assert_eq!(mv.piece, PieceKind::Pawn);

        let board: Board = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1"
            .parse()
            .unwrap();
        assert_eq!(parse_uci_move(&board, "e1g1").unwrap().kind, MoveKind::CastleShort);
        let capture = parse_uci_move(&board, "e5f7").unwrap();
        assert_eq!(capture.captured, Some(PieceKind::Pawn));
        assert_eq!(capture.piece, PieceKind::Knight);
    }

    #[test]
    fn promotion_letter_selects_the_piece() {
        let board: Board = "4k3/P7/8/8/8/8/8/4K3 w - - 0 1".parse().unwrap();
        let mv = parse_uci_move(&board, "a7a8n").unwrap();
        assert_eq!(mv.promotion, Some(PieceKind::Knight));
        assert!(matches!(parse_uci_move(&board, "a7a8"), Err(MoveError::NotPseudoLegal { .. })));
        assert!(matches!(parse_uci_move(&board, "a7a8k"), Err(MoveError::Malformed { .. })));
    }

    #[test]
    fn rejections() {
        let board = Board::starting_position();
        assert!(matches!(parse_uci_move(&board, "e2"), Err(MoveError::Malformed { .. })));
        assert!(matches!(parse_uci_move(&board, "z2e4"), Err(MoveError::Malformed { .. })));
        assert_eq!(
            parse_uci_move(&board, "e4e5"),
            Err(MoveError::EmptySource { square: Square::E4 })
        );
        assert_eq!(
            parse_uci_move(&board, "e7e5"),
            Err(MoveError::WrongColor { square: Square::E7 })
        );
        assert_eq!(
            parse_uci_move(&board, "e2e5"),
            Err(MoveError::NotPseudoLegal { text: "e2e5".into() })
        );
    }
}
