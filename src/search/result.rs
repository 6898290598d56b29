//! Per-candidate outcomes and the ranked result table.

use crate::models::arima::CandidateOrder;
use std::cmp::Ordering;
use std::fmt;

/// Outcome of evaluating one candidate order.
#[derive(Debug, Clone, PartialEq)]
pub enum CandidateOutcome {
    /// Validation accuracy of the candidate.
    Scored { mae: f64, rmse: f64 },
    /// Estimation or re-application failed; the reason is kept for reporting.
    Failed(String),
}

impl CandidateOutcome {
    /// RMSE, if the candidate produced a finite score.
    pub fn rmse(&self) -> Option<f64> {
        match self {
            CandidateOutcome::Scored { rmse, .. } if rmse.is_finite() => Some(*rmse),
            _ => None,
        }
    }

    /// MAE, if the candidate produced a finite score.
    pub fn mae(&self) -> Option<f64> {
        match self {
            CandidateOutcome::Scored { mae, .. } if mae.is_finite() => Some(*mae),
            _ => None,
        }
    }

    pub fn is_scored(&self) -> bool {
        self.rmse().is_some()
    }

    pub fn failure(&self) -> Option<&str> {
        match self {
            CandidateOutcome::Failed(reason) => Some(reason),
            CandidateOutcome::Scored { .. } => None,
        }
    }
}

impl fmt::Display for CandidateOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateOutcome::Scored { mae, rmse } => write!(f, "MAE={:.4} RMSE={:.4}", mae, rmse),
            CandidateOutcome::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

/// One row of the search table.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Position of the candidate in grid enumeration order.
    pub index: usize,
    pub order: CandidateOrder,
    pub outcome: CandidateOutcome,
}

impl SearchResult {
    pub fn new(index: usize, order: CandidateOrder, outcome: CandidateOutcome) -> Self {
        Self {
            index,
            order,
            outcome,
        }
    }
}

/// Ascending by RMSE, then MAE, undefined scores last, then grid index.
fn rank(a: &SearchResult, b: &SearchResult) -> Ordering {
    let score = |r: &SearchResult| r.outcome.rmse().zip(r.outcome.mae());
    match (score(a), score(b)) {
        (Some((rmse_a, mae_a)), Some((rmse_b, mae_b))) => rmse_a
            .total_cmp(&rmse_b)
            .then(mae_a.total_cmp(&mae_b))
            .then(a.index.cmp(&b.index)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.index.cmp(&b.index),
    }
}

/// Ranked table of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchTable {
    rows: Vec<SearchResult>,
}

impl SearchTable {
    /// Sort `rows` into ranking order.
    pub fn from_results(mut rows: Vec<SearchResult>) -> Self {
        rows.sort_by(rank);
        Self { rows }
    }

    pub fn rows(&self) -> &[SearchResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchResult> {
        self.rows.iter()
    }

    /// Best scored candidate, if any candidate succeeded.
    pub fn best(&self) -> Option<&SearchResult> {
        self.rows.first().filter(|r| r.outcome.is_scored())
    }

    /// Number of candidates that failed.
    pub fn failures(&self) -> usize {
        self.rows.iter().filter(|r| !r.outcome.is_scored()).count()
    }
}
