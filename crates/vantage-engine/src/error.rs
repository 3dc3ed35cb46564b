//! Engine handle error types.

/// Errors reported by [`Engine`](crate::Engine).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("a search is already running")]
    Busy,

    #[error("no search has been submitted")]
    NoSearch,

    #[error("search worker panicked")]
    WorkerPanicked,

    #[error("hash size {mb} MiB is outside 1..=4096")]
    InvalidHashSize { mb: usize },
}
