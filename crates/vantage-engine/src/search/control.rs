//! Search control: stop flag and time limits.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::time::TimeBudget;

/// Nodes between clock checks, minus one. Must be `2^n - 1`.
const CLOCK_CHECK_MASK: u64 = 2047;

/// Controls when a search should stop.
///
/// The clock starts when the control is created. The stop flag is shared
/// with whoever may cancel the search from another thread.
#[derive(Debug)]
pub struct SearchControl {
    stopped: Arc<AtomicBool>,
    start: Instant,
    soft_limit: Option<Duration>,
    hard_limit: Option<Duration>,
}

impl SearchControl {
    pub fn new(stopped: Arc<AtomicBool>, budget: TimeBudget) -> Self {
        Self {
            stopped,
            start: Instant::now(),
            soft_limit: budget.soft,
            hard_limit: budget.hard,
        }
    }

    /// No time limits; only the stop flag ends the search early.
    pub fn new_infinite(stopped: Arc<AtomicBool>) -> Self {
        Self::new(stopped, TimeBudget::unlimited())
    }

    /// Whether the search should abort now.
    ///
    /// The stop flag is read on every call, the clock only every 2048
    /// nodes. When the hard limit fires the stop flag is raised so later
    /// calls return immediately.
    pub fn should_stop(&self, nodes: u64) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        if nodes & CLOCK_CHECK_MASK != 0 {
            return false;
        }
        if let Some(hard) = self.hard_limit
            && self.elapsed() >= hard
        {
            self.stopped.store(true, Ordering::Release);
            return true;
        }
        false
    }

    /// Whether iterative deepening should not start another depth.
    pub fn should_stop_iterating(&self) -> bool {
        if self.stopped.load(Ordering::Relaxed) {
            return true;
        }
        self.soft_limit.is_some_and(|soft| self.elapsed() >= soft)
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn stop_flag(&self) -> &Arc<AtomicBool> {
        &self.stopped
    }
}
