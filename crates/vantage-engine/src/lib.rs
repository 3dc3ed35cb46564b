//! Evaluation, search and the engine handle for vantage.

mod config;
mod engine;
mod error;
pub mod eval;
pub mod search;
mod time;

pub use config::{DEFAULT_HASH_MB, DEFAULT_MAX_DEPTH, EngineConfig, HASH_MB_RANGE, HistoryPolicy};
pub use engine::{Engine, ProgressCallback};
pub use error::EngineError;
pub use eval::evaluate;
pub use search::alphabeta::{INF, MATE, MATE_THRESHOLD, MAX_PLY, is_mate_score, mate_distance};
pub use search::control::SearchControl;
pub use search::stats::SearchStats;
pub use search::tt::{Bound, TranspositionTable, TtHit};
pub use search::{SearchLimits, SearchProgress, SearchResult, Searcher};
pub use time::TimeBudget;
