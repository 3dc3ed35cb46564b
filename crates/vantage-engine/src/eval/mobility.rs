//! Coarse mobility: the difference in pseudo-legal move counts.

use vantage_core::{Board, Color, MoveList, generate_moves};

use crate::eval::score::{S, Score};

/// Bonus per pseudo-legal move one side has over the other.
const MOBILITY_UNIT: Score = S(2, 2);

/// Pseudo-legal moves available to each side, `[white, black]`.
pub fn move_counts(board: &Board) -> [usize; Color::COUNT] {
    let mut list = MoveList::new();
    generate_moves(board, &mut list);
    let to_move = list.len();

    let mut flipped = *board;
    flipped.make_null_move();
    list.clear();
    generate_moves(&flipped, &mut list);
    let other = list.len();

    match board.side_to_move() {
        Color::White => [to_move, other],
        Color::Black => [other, to_move],
    }
}

/// Mobility from White's perspective.
pub fn evaluate_mobility(board: &Board) -> Score {
    let [white, black] = move_counts(board);
    MOBILITY_UNIT * (white as i16 - black as i16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starting_position_is_even() {
        let board = Board::starting_position();
        assert_eq!(move_counts(&board), [20, 20]);
        assert_eq!(evaluate_mobility(&board), Score::ZERO);
    }

    #[test]
    fn counts_do_not_depend_on_side_to_move() {
        let white: Board = "4k3/8/8/8/8/8/8/R3K3 w - - 0 1".parse().unwrap();
        let black: Board = "4k3/8/8/8/8/8/8/R3K3 b - - 0 1".parse().unwrap();
        assert_eq!(move_counts(&white), move_counts(&black));
        // Rook: 7 up the file + 3 along the rank; king: 5. Black king: 5.
        assert_eq!(move_counts(&white), [15, 5]);
        assert_eq!(evaluate_mobility(&white), S(20, 20));
    }
}
