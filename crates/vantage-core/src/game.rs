//! A game record: the current position, the moves that led to it, and the
//! occurrence counts needed for repetition draws.

use std::collections::HashMap;

use tracing::trace;

use crate::board::Board;
use crate::chess_move::{Move, MoveList};
use crate::color::Color;
use crate::error::MoveError;
use crate::make_move::Undo;
use crate::movegen::{generate_moves, is_legal, legal_moves, parse_uci_move};
use crate::piece::PieceKind;

/// How many times each position signature has occurred.
///
/// The signature is the Zobrist hash, which covers castling rights and the
/// en passant square, so positions that differ only in those are distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepetitionTable {
    counts: HashMap<u64, u32>,
}

impl RepetitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `hash`.
    pub fn push(&mut self, hash: u64) {
        *self.counts.entry(hash).or_insert(0) += 1;
    }

    /// Forget one occurrence of `hash`, the inverse of [`push`](Self::push).
    pub fn pop(&mut self, hash: u64) {
        if let Some(count) = self.counts.get_mut(&hash) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&hash);
            }
        }
    }

    pub fn count(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Outcome of the position at the end of a game record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    /// The side to move is checkmated.
    Checkmate,
    Stalemate,
    /// The current position has occurred for the third time.
    DrawByRepetition,
    DrawByFiftyMoves,
    DrawByInsufficientMaterial,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        self != GameStatus::Ongoing
    }
}

impl Board {
    /// Bare kings, or one side holding a single knight or bishop and nothing else.
    pub fn has_insufficient_material(&self) -> bool {
        let heavy_or_pawn = [PieceKind::Pawn, PieceKind::Rook, PieceKind::Queen];
        if Color::ALL
            .into_iter()
            .any(|c| heavy_or_pawn.into_iter().any(|k| self.pieces(c, k).is_nonempty()))
        {
            return false;
        }
        let minors: u32 = Color::ALL
            .into_iter()
            .map(|c| (self.pieces(c, PieceKind::Knight) | self.pieces(c, PieceKind::Bishop)).count())
            .sum();
        minors <= 1
    }
}

/// Position plus move history.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    history: Vec<(Move, Undo)>,
    repetitions: RepetitionTable,
}

impl Game {
    pub fn new(board: Board) -> Self {
        let mut repetitions = RepetitionTable::new();
        repetitions.push(board.hash());
        Self { board, history: Vec::new(), repetitions }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn repetitions(&self) -> &RepetitionTable {
        &self.repetitions
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.history.iter().map(|(mv, _)| *mv)
    }

    pub fn legal_moves(&self) -> MoveList {
        legal_moves(&self.board)
    }

    /// Play `mv` if it is legal. On error the game is unchanged.
    ///
    /// Only the move's identity (from, to, promotion) is looked at; the
    /// annotations are taken from the generator.
    pub fn play(&mut self, mv: Move) -> Result<(), MoveError> {
        let mut list = MoveList::new();
        generate_moves(&self.board, &mut list);
        let Some(mv) = list.into_iter().find(|m| *m == mv) else {
            return Err(MoveError::NotPseudoLegal { text: mv.to_uci() });
        };
        self.commit(mv)
    }

    /// Play a move given as coordinate text.
    pub fn play_uci(&mut self, text: &str) -> Result<(), MoveError> {
        let mv = parse_uci_move(&self.board, text)?;
        self.commit(mv)
    }

    fn commit(&mut self, mv: Move) -> Result<(), MoveError> {
        if !is_legal(&self.board, mv) {
            return Err(MoveError::LeavesKingInCheck { text: mv.to_uci() });
        }
        let undo = self.board.make_move(mv);
        self.history.push((mv, undo));
        self.repetitions.push(self.board.hash());
        trace!(%mv, fen = %self.board, "move played");
        Ok(())
    }

    /// Take back the last move, returning it.
    pub fn undo(&mut self) -> Option<Move> {
        let (mv, undo) = self.history.pop()?;
        self.repetitions.pop(self.board.hash());
        self.board.unmake_move(mv, undo);
        Some(mv)
    }

    /// Occurrences of the current position, counting this one.
    pub fn repetition_count(&self) -> u32 {
        self.repetitions.count(self.board.hash())
    }

    pub fn status(&self) -> GameStatus {
        if self.legal_moves().is_empty() {
            return if self.board.in_check(self.board.side_to_move()) {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            };
        }
        if self.board.halfmove_clock() >= 100 {
            return GameStatus::DrawByFiftyMoves;
        }
        if self.repetition_count() >= 3 {
            return GameStatus::DrawByRepetition;
        }
        if self.board.has_insufficient_material() {
            return GameStatus::DrawByInsufficientMaterial;
        }
        GameStatus::Ongoing
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new(Board::starting_position())
    }
}
