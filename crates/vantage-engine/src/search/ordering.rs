//! Move ordering: TT move, then MVV-LVA captures and promotions, then
//! killers, then history.

use vantage_core::{Move, MoveList, PieceKind};

use crate::search::heuristics::{HistoryTable, KillerTable};

/// Score given to the move stored in the transposition table.
pub const TT_MOVE_SCORE: i32 = 1_000_000;

/// Base for captures and promotions. Every capture lands above the killers,
/// even a king taking a pawn.
const TACTICAL_BASE: i32 = 200_000;

/// Killer slot 0 and slot 1.
const KILLER_SCORES: [i32; 2] = [90_000, 80_000];

/// Ordering key for a capture or promotion: most valuable victim first,
/// then least valuable attacker, with the promotion gain added.
pub fn score_tactical(mv: Move) -> i32 {
    let victim = mv.captured.map_or(0, PieceKind::value);
    let attacker = if mv.is_capture() { mv.piece.value() } else { 0 };
    let promotion = mv.promotion.map_or(0, |p| p.value() - PieceKind::Pawn.value());
    TACTICAL_BASE + victim - attacker + promotion
}

/// Ordering key for any move in the main search.
pub fn score_move(mv: Move, tt_move: Move, killers: &KillerTable, history: &HistoryTable, ply: usize) -> i32 {
    if mv == tt_move {
        TT_MOVE_SCORE
    } else if !mv.is_quiet() {
        score_tactical(mv)
    } else if let Some(slot) = killers.slot_of(ply, mv) {
        KILLER_SCORES[slot]
    } else {
        // Stays well below the killers even after the table saturates.
        history.score(mv) / 100
    }
}

/// Incremental move picker using selection sort.
///
/// Scores are written into each move's `score` field up front; moves are
/// then yielded highest first, one swap per call, so a cutoff early in the
/// list never pays for sorting the rest.
pub struct MovePicker {
    moves: MoveList,
    cursor: usize,
}

impl MovePicker {
    /// Picker for the main search.
    pub fn new(mut moves: MoveList, tt_move: Move, killers: &KillerTable, history: &HistoryTable, ply: usize) -> Self {
        for mv in moves.as_mut_slice() {
            mv.score = score_move(*mv, tt_move, killers, history, ply);
        }
        Self { moves, cursor: 0 }
    }

    /// Picker for quiescence search, where every move is tactical.
    pub fn new_qsearch(mut moves: MoveList) -> Self {
        for mv in moves.as_mut_slice() {
            mv.score = score_tactical(*mv);
        }
        Self { moves, cursor: 0 }
    }

    /// Yield the next highest-scored move.
    pub fn pick_next(&mut self) -> Option<Move> {
        let moves = self.moves.as_mut_slice();
        if self.cursor >= moves.len() {
            return None;
        }

        let mut best_idx = self.cursor;
        for i in (self.cursor + 1)..moves.len() {
            if moves[i].score > moves[best_idx].score {
                best_idx = i;
            }
        }
        moves.swap(self.cursor, best_idx);

        let mv = moves[self.cursor];
        self.cursor += 1;
        Some(mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vantage_core::{Board, generate_moves, parse_uci_move};

    fn board(fen: &str) -> Board {
        fen.parse().unwrap()
    }

    fn drain(mut picker: MovePicker) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(mv) = picker.pick_next() {
            out.push(mv.to_uci());
        }
        out
    }

    #[test]
    fn lighter_attacker_preferred_for_same_victim() {
        // Both the pawn on c4 and the queen on d1 can take the rook on d5.
        let b = board("4k3/8/8/3r4/2P5/8/8/3QK3 w - - 0 1");
        let pxr = parse_uci_move(&b, "c4d5").unwrap();
        let qxr = parse_uci_move(&b, "d1d5").unwrap();
        assert!(score_tactical(pxr) > score_tactical(qxr));
    }

    #[test]
    fn bigger_victim_preferred() {
        let b = board("4k3/8/8/2q1r3/3P4/8/8/4K3 w - - 0 1");
        let pxq = parse_uci_move(&b, "d4c5").unwrap();
        let pxr = parse_uci_move(&b, "d4e5").unwrap();
        assert!(score_tactical(pxq) > score_tactical(pxr));
    }

    #[test]
    fn queen_promotion_outranks_underpromotion() {
        let b = board("7k/4P3/8/8/8/8/8/4K3 w - - 0 1");
        let queen = parse_uci_move(&b, "e7e8q").unwrap();
        let knight = parse_uci_move(&b, "e7e8n").unwrap();
        assert!(score_tactical(queen) > score_tactical(knight));
    }

    #[test]
    fn picker_order_tt_captures_killers_history() {
        let b = board("4k3/8/8/3p4/4P3/8/8/R3K3 w - - 0 1");
        let mut list = MoveList::new();
        generate_moves(&b, &mut list);

        let tt_move = parse_uci_move(&b, "a1a7").unwrap();
        let killer = parse_uci_move(&b, "a1a2").unwrap();
        let favoured = parse_uci_move(&b, "e1f2").unwrap();

        let mut killers = KillerTable::new();
        killers.store(2, killer);
        let mut history = HistoryTable::new();
        history.update(favoured, 20);

        let order = drain(MovePicker::new(list, tt_move, &killers, &history, 2));
        assert_eq!(&order[..4], &["a1a7", "e4d5", "a1a2", "e1f2"]);
    }

    #[test]
    fn picker_yields_every_move_once() {
        let b = Board::starting_position();
        let mut list = MoveList::new();
        generate_moves(&b, &mut list);
        let order = drain(MovePicker::new(list, Move::NULL, &KillerTable::new(), &HistoryTable::new(), 0));
        assert_eq!(order.len(), 20);
        let mut unique = order.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 20);
    }
}
