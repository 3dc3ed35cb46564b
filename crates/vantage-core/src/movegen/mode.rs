//! Compile-time selection between full and capture-only generation.

/// Which moves a generator pass emits.
pub(crate) trait GenMode {
    /// Emit quiet moves (non-capturing, non-promoting) as well.
    const QUIETS: bool;
}

/// Every pseudo-legal move.
pub(crate) struct AllMoves;

/// Captures and promotions only, for quiescence search.
pub(crate) struct CapturesOnly;

impl GenMode for AllMoves {
    const QUIETS: bool = true;
}

impl GenMode for CapturesOnly {
    const QUIETS: bool = false;
}
