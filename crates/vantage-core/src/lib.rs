//! Core chess types: board representation, move generation, and game rules.

mod attacks;
mod bitboard;
mod board;
mod castle_rights;
mod chess_move;
mod color;
mod error;
mod fen;
mod game;
mod make_move;
mod movegen;
mod perft;
mod piece;
mod square;
mod zobrist;

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, piece_attacks, queen_attacks, rook_attacks,
};
pub use bitboard::Bitboard;
pub use board::{Board, PrettyBoard, STARTING_FEN};
pub use castle_rights::{CastlePath, CastleRights, CastleSide};
pub use chess_move::{MOVE_LIST_CAPACITY, Move, MoveKind, MoveList};
pub use color::Color;
pub use error::{BoardError, FenError, MoveError};
pub use game::{Game, GameStatus, RepetitionTable};
pub use make_move::Undo;
pub use movegen::{generate_captures, generate_moves, is_legal, legal_moves, parse_uci_move};
pub use perft::{divide, perft};
pub use piece::{Piece, PieceKind};
pub use square::{ParseSquareError, Square};
pub use zobrist::hash_from_scratch;
