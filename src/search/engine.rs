//! Parallel exhaustive search over SARIMA orders.
//!
//! Every candidate is estimated on the training range from scratch, its
//! coefficients are re-applied to the validation range without
//! re-estimation, and the one-step fitted values there are scored against
//! the observations. Candidates run on a dedicated worker pool and never
//! share mutable state; a failing or panicking candidate becomes a
//! [`CandidateOutcome::Failed`] row instead of aborting the search.

use crate::core::Series;
use crate::error::{ForecastError, Result};
use crate::models::arima::{CandidateOrder, FitOptions, SARIMA};
use crate::models::Forecaster;
use crate::search::grid::OrderGrid;
use crate::search::progress::SearchProgress;
use crate::search::result::{CandidateOutcome, SearchResult, SearchTable};
use crate::utils::metrics::calculate_metrics;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Worker count used when none is configured: all cores but one.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

/// Settings for one search run.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Number of worker threads.
    pub concurrency: usize,
    /// Wall-clock budget per candidate estimation.
    pub candidate_timeout: Option<Duration>,
    /// Optimizer settings shared by all candidates.
    pub fit: FitOptions,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            candidate_timeout: None,
            fit: FitOptions::default(),
        }
    }
}

impl SearchOptions {
    fn candidate_fit_options(&self) -> FitOptions {
        FitOptions {
            time_budget: self.candidate_timeout.or(self.fit.time_budget),
            ..self.fit.clone()
        }
    }
}

/// Estimate `order` on `train` and score its one-step fitted values on `validation`.
pub fn evaluate_candidate(
    train: &Series,
    validation: &Series,
    order: CandidateOrder,
    options: &FitOptions,
) -> CandidateOutcome {
    let mut model = SARIMA::with_options(order, options.clone());
    if let Err(e) = model.fit(train) {
        return CandidateOutcome::Failed(e.to_string());
    }

    let applied = match model.apply(validation) {
        Ok(applied) => applied,
        Err(e) => return CandidateOutcome::Failed(format!("refit on validation: {}", e)),
    };
    let fitted = match applied.fitted_values() {
        Some(fitted) => fitted,
        None => return CandidateOutcome::Failed(ForecastError::FitRequired.to_string()),
    };

    match calculate_metrics(validation.values(), fitted) {
        Ok(metrics) => CandidateOutcome::Scored {
            mae: metrics.mae,
            rmse: metrics.rmse,
        },
        Err(e) => CandidateOutcome::Failed(format!("scoring: {}", e)),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {}", message)
    } else {
        "panicked".to_string()
    }
}

fn build_pool(threads: usize) -> Option<ThreadPool> {
    let requested = threads.max(1);
    let try_build = |n| ThreadPoolBuilder::new().num_threads(n).build();
    match try_build(requested) {
        Ok(pool) => Some(pool),
        Err(e) if requested > 1 => {
            warn!(requested, error = %e, "falling back to a single search worker");
            try_build(1).ok()
        }
        Err(_) => None,
    }
}

/// Evaluate every order of `grid` and return the ranked table.
///
/// Progress is reported through `progress` after each candidate completes.
/// Only invalid inputs (an empty grid dimension or an empty range) fail the
/// call; per-candidate failures are recorded in the table.
pub fn search(
    train: &Series,
    validation: &Series,
    grid: &OrderGrid,
    period: usize,
    options: &SearchOptions,
    progress: &dyn SearchProgress,
) -> Result<SearchTable> {
    grid.validate()?;
    if train.is_empty() || validation.is_empty() {
        return Err(ForecastError::EmptyData);
    }

    let candidates = grid.candidates(period);
    let total = candidates.len();
    let fit_options = options.candidate_fit_options();
    let completed = AtomicUsize::new(0);

    info!(
        candidates = total,
        workers = options.concurrency,
        train = train.len(),
        validation = validation.len(),
        "starting order search"
    );

    let run = |(index, order): (usize, CandidateOrder)| -> SearchResult {
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            evaluate_candidate(train, validation, order, &fit_options)
        }))
        .unwrap_or_else(|payload| CandidateOutcome::Failed(panic_message(payload)));
        debug!(index, order = %order, outcome = %outcome, "candidate evaluated");

        let result = SearchResult::new(index, order, outcome);
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        progress.on_candidate(done, total, &result);
        result
    };

    let rows: Vec<SearchResult> = match build_pool(options.concurrency) {
        Some(pool) => pool.install(|| candidates.into_par_iter().enumerate().map(&run).collect()),
        None => candidates.into_iter().enumerate().map(&run).collect(),
    };

    let table = SearchTable::from_results(rows);
    match table.best() {
        Some(best) => info!(
            order = %best.order,
            outcome = %best.outcome,
            failures = table.failures(),
            "order search finished"
        ),
        None => warn!(candidates = total, "order search finished without a scored candidate"),
    }
    Ok(table)
}
