//! Time management: turn clock parameters into search limits.

use std::time::Duration;

use vantage_core::Color;

/// Moves assumed to remain when the GUI does not say.
const DEFAULT_MOVES_TO_GO: u32 = 30;

/// Kept in reserve so the engine never flags on transmission delay.
const SAFETY_MARGIN: Duration = Duration::from_millis(50);

const MIN_BUDGET: Duration = Duration::from_millis(1);

/// How long one search may run.
///
/// `soft` is checked between iterative-deepening iterations: once it has
/// passed, no new depth is started. `hard` aborts the search mid-iteration.
/// `None` means no limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimeBudget {
    pub soft: Option<Duration>,
    pub hard: Option<Duration>,
}

impl TimeBudget {
    /// No time limit; the search ends on depth or an external stop.
    pub const fn unlimited() -> Self {
        Self { soft: None, hard: None }
    }

    /// Spend exactly `time` on the move.
    pub const fn move_time(time: Duration) -> Self {
        Self { soft: Some(time), hard: Some(time) }
    }

    /// Budget from the side's remaining clock time and increment.
    ///
    /// The hard limit is `remaining / moves_to_go + increment / 2`, capped at
    /// `remaining` minus the safety margin; the soft limit is half of it.
    pub fn from_clock(remaining: Duration, increment: Duration, moves_to_go: Option<u32>) -> Self {
        let divisor = moves_to_go.unwrap_or(DEFAULT_MOVES_TO_GO).max(1);
        let cap = remaining.saturating_sub(SAFETY_MARGIN).max(MIN_BUDGET);
        let hard = (remaining / divisor + increment / 2).min(cap).max(MIN_BUDGET);
        let soft = (hard / 2).max(MIN_BUDGET);
        Self { soft: Some(soft), hard: Some(hard) }
    }

    /// Build a budget from UCI `go` parameters and the side to move.
    ///
    /// Priority: `infinite`, then `movetime`, then the mover's clock. A bare
    /// `go` or `go depth N` is unlimited.
    #[allow(clippy::too_many_arguments)]
    pub fn from_go(
        wtime: Option<Duration>,
        btime: Option<Duration>,
        winc: Option<Duration>,
        binc: Option<Duration>,
        movestogo: Option<u32>,
        movetime: Option<Duration>,
        infinite: bool,
        side: Color,
    ) -> Self {
        if infinite {
            return Self::unlimited();
        }
        if let Some(time) = movetime {
            return Self::move_time(time);
        }

        let (remaining, increment) = match side {
            Color::White => (wtime, winc),
            Color::Black => (btime, binc),
        };
        match remaining {
            Some(remaining) => Self::from_clock(remaining, increment.unwrap_or(Duration::ZERO), movestogo),
            None => Self::unlimited(),
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.soft.is_none() && self.hard.is_none()
    }
}
