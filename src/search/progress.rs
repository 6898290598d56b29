//! Progress observers for the order search.

use crate::search::result::SearchResult;
use std::sync::Mutex;
use tracing::{info, warn};

/// Observer invoked once per completed candidate.
///
/// `completed` counts finished candidates, so it grows by one per call
/// regardless of which worker finished.
pub trait SearchProgress: Send + Sync {
    fn on_candidate(&self, completed: usize, total: usize, result: &SearchResult);
}

/// Logs every completed candidate through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl SearchProgress for LogProgress {
    fn on_candidate(&self, completed: usize, total: usize, result: &SearchResult) {
        match result.outcome.failure() {
            None => info!(
                completed,
                total,
                order = %result.order,
                mae = result.outcome.mae().unwrap_or(f64::NAN),
                rmse = result.outcome.rmse().unwrap_or(f64::NAN),
                "candidate {}/{} scored",
                completed,
                total
            ),
            Some(reason) => warn!(
                completed,
                total,
                order = %result.order,
                reason,
                "candidate {}/{} failed",
                completed,
                total
            ),
        }
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl SearchProgress for NoProgress {
    fn on_candidate(&self, _completed: usize, _total: usize, _result: &SearchResult) {}
}

/// Records `(completed, total, grid index)` for every call.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<(usize, usize, usize)>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(usize, usize, usize)> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SearchProgress for RecordingProgress {
    fn on_candidate(&self, completed: usize, total: usize, result: &SearchResult) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push((completed, total, result.index));
    }
}

impl<F> SearchProgress for F
where
    F: Fn(usize, usize, &SearchResult) + Send + Sync,
{
    fn on_candidate(&self, completed: usize, total: usize, result: &SearchResult) {
        self(completed, total, result)
    }
}
