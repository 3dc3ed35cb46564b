//! Perft (performance test) for move generation correctness verification.

use crate::board::Board;
use crate::chess_move::MoveList;
use crate::movegen::generate_moves;

/// Count the number of leaf nodes at the given depth.
///
/// Depth 0 returns 1 (the current position).
pub fn perft(board: &Board, depth: u32) -> u64 {
    let mut scratch = *board;
    count(&mut scratch, depth)
}

/// Run perft with per-move breakdown (useful for debugging).
///
/// Returns `(uci_move, node_count)` pairs sorted alphabetically.
pub fn divide(board: &Board, depth: u32) -> Vec<(String, u64)> {
    let mut scratch = *board;
    let us = scratch.side_to_move();
    let mut moves = MoveList::new();
    generate_moves(&scratch, &mut moves);

    let mut results = Vec::with_capacity(moves.len());
    for mv in moves {
        let undo = scratch.make_move(mv);
        if !scratch.in_check(us) {
            let nodes = count(&mut scratch, depth.saturating_sub(1));
            results.push((mv.to_uci(), nodes));
        }
        scratch.unmake_move(mv, undo);
    }
    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

fn count(board: &mut Board, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let us = board.side_to_move();
    let mut moves = MoveList::new();
    generate_moves(board, &mut moves);

    let mut nodes = 0;
    for mv in moves {
        let undo = board.make_move(mv);
        if !board.in_check(us) {
            nodes += count(board, depth - 1);
        }
        board.unmake_move(mv, undo);
    }
    nodes
}
