//! UCI protocol errors.

use vantage_core::{FenError, MoveError};
use vantage_engine::EngineError;

/// Errors that can occur during UCI protocol handling.
#[derive(Debug, thiserror::Error)]
pub enum UciError {
    /// The `position` command is missing `startpos` or `fen` keyword.
    #[error("malformed position command: missing startpos or fen keyword")]
    MalformedPosition,

    #[error("invalid FEN \"{fen}\": {source}")]
    InvalidFen {
        fen: String,
        #[source]
        source: FenError,
    },

    /// A move in the `position` command could not be played.
    #[error("invalid move {uci_move}: {source}")]
    InvalidMove {
        uci_move: String,
        #[source]
        source: MoveError,
    },

    #[error("missing value for go parameter {param}")]
    MissingGoValue { param: String },

    #[error("invalid value for go parameter {param}: {value}")]
    InvalidGoValue { param: String, value: String },

    /// `setoption` without `name`, or `value` missing where one is required.
    #[error("malformed setoption command")]
    MalformedSetOption,

    #[error("unknown option {name}")]
    UnknownOption { name: String },

    #[error("invalid value for option {name}: {value}")]
    InvalidOptionValue { name: String, value: String },

    #[error("invalid perft depth: {value}")]
    InvalidPerftDepth { value: String },

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    /// An I/O error occurred while reading from stdin.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}
