//! Engine configuration.

use crate::error::EngineError;

/// Valid transposition-table sizes in MiB.
pub const HASH_MB_RANGE: std::ops::RangeInclusive<usize> = 1..=4096;

pub const DEFAULT_HASH_MB: usize = 16;
pub const DEFAULT_MAX_DEPTH: u8 = 64;

/// What happens to the history table between two root searches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Halve every entry, so recent cutoffs dominate but earlier ones still
    /// help ordering in the same game.
    #[default]
    Age,
    /// Start every search from an empty table.
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Transposition table size in MiB.
    pub hash_mb: usize,
    /// Depth used when a search request does not name one.
    pub max_depth: u8,
    pub history: HistoryPolicy,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !HASH_MB_RANGE.contains(&self.hash_mb) {
            return Err(EngineError::InvalidHashSize { mb: self.hash_mb });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hash_mb: DEFAULT_HASH_MB,
            max_depth: DEFAULT_MAX_DEPTH,
            history: HistoryPolicy::default(),
        }
    }
}
