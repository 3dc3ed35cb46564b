//! Non-blocking engine handle.
//!
//! A submitted search runs on a worker thread that owns the [`Searcher`]
//! exclusively and hands it back when it finishes, so the transposition
//! table and heuristics carry over between searches without ever being
//! touched by two threads at once.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};
use vantage_core::{Board, RepetitionTable};

use crate::config::{EngineConfig, HASH_MB_RANGE, HistoryPolicy};
use crate::error::EngineError;
use crate::search::control::SearchControl;
use crate::search::{SearchLimits, SearchProgress, SearchResult, Searcher};
use crate::time::TimeBudget;

/// Called on the worker thread after every completed depth.
pub type ProgressCallback = Box<dyn FnMut(&SearchProgress) + Send>;

/// What the worker hands back.
struct Finished {
    searcher: Searcher,
    progress: Option<ProgressCallback>,
    result: SearchResult,
}

pub struct Engine {
    config: EngineConfig,
    /// `None` while a worker owns it, or after a worker panicked.
    searcher: Option<Searcher>,
    progress: Option<ProgressCallback>,
    worker: Option<JoinHandle<Finished>>,
    stop: Arc<AtomicBool>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self {
            config,
            searcher: Some(Searcher::new(config.hash_mb, config.history)),
            progress: None,
            worker: None,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// True while a submitted search has not finished yet.
    pub fn is_searching(&self) -> bool {
        self.worker.as_ref().is_some_and(|w| !w.is_finished())
    }

    /// Whether the last submitted search has finished. Never blocks.
    ///
    /// Also true when nothing was submitted.
    pub fn is_complete(&self) -> bool {
        !self.is_searching()
    }

    /// Install the callback run after each completed depth.
    pub fn set_progress<F>(&mut self, callback: F) -> Result<(), EngineError>
    where
        F: FnMut(&SearchProgress) + Send + 'static,
    {
        self.ensure_idle()?;
        self.reclaim();
        self.progress = Some(Box::new(callback));
        Ok(())
    }

    /// Start searching `board` on a worker thread.
    ///
    /// `repetitions` holds the game's earlier positions, the root included.
    /// `max_depth` falls back to the configured default. An unclaimed result
    /// from an earlier search is discarded.
    pub fn submit(
        &mut self,
        board: &Board,
        repetitions: &RepetitionTable,
        max_depth: Option<u8>,
        budget: TimeBudget,
    ) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.reclaim();

        let mut searcher = self
            .searcher
            .take()
            .unwrap_or_else(|| Searcher::new(self.config.hash_mb, self.config.history));
        let mut progress = self.progress.take();
        let limits = SearchLimits::depth(max_depth.unwrap_or(self.config.max_depth));

        self.stop.store(false, Ordering::Release);
        let control = SearchControl::new(Arc::clone(&self.stop), budget);
        let board = *board;
        let repetitions = repetitions.clone();

        debug!(fen = %board, depth = limits.max_depth, ?budget, "search submitted");
        self.worker = Some(thread::spawn(move || {
            let result = searcher.search(&board, &repetitions, limits, &control, |p| {
                if let Some(callback) = progress.as_mut() {
                    callback(p);
                }
            });
            debug!(
                depth = result.depth,
                score = result.score,
                nodes = result.stats.nodes,
                elapsed_ms = result.elapsed.as_millis() as u64,
                "search finished"
            );
            Finished { searcher, progress, result }
        }));
        Ok(())
    }

    /// Ask the running search to stop. Returns immediately; use
    /// [`wait`](Self::wait) to collect the result.
    pub fn stop(&self) {
        if self.worker.is_some() {
            debug!("stop requested");
        }
        self.stop.store(true, Ordering::Release);
    }

    /// Block until the submitted search finishes and return its result.
    pub fn wait(&mut self) -> Result<SearchResult, EngineError> {
        self.collect()
    }

    fn collect(&mut self) -> Result<SearchResult, EngineError> {
        let worker = self.worker.take().ok_or(EngineError::NoSearch)?;
        match worker.join() {
            Ok(finished) => {
                self.searcher = Some(finished.searcher);
                self.progress = finished.progress;
                Ok(finished.result)
            }
            Err(_) => {
                warn!("search worker panicked; starting over with a fresh searcher");
                Err(EngineError::WorkerPanicked)
            }
        }
    }

    /// Resize the transposition table, discarding its contents.
    pub fn set_hash(&mut self, mb: usize) -> Result<(), EngineError> {
        if !HASH_MB_RANGE.contains(&mb) {
            return Err(EngineError::InvalidHashSize { mb });
        }
        self.ensure_idle()?;
        self.reclaim();
        self.config.hash_mb = mb;
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.resize_tt(mb);
        }
        Ok(())
    }

    pub fn set_history_policy(&mut self, policy: HistoryPolicy) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.reclaim();
        self.config.history = policy;
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.set_history_policy(policy);
        }
        Ok(())
    }

    /// Forget the transposition table and heuristics.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.ensure_idle()?;
        self.reclaim();
        if let Some(searcher) = self.searcher.as_mut() {
            searcher.clear();
        }
        Ok(())
    }

    fn ensure_idle(&self) -> Result<(), EngineError> {
        if self.is_searching() {
            return Err(EngineError::Busy);
        }
        Ok(())
    }

    /// Take back the searcher from a finished but uncollected worker.
    fn reclaim(&mut self) {
        if self.worker.is_some() {
            // A panicked worker leaves `searcher` empty; submit rebuilds it.
            let _ = self.collect();
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("searching", &self.is_searching())
            .finish()
    }
}
