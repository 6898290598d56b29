//! Chronological train / validation / test partitioning.
//!
//! Cut points are `floor(train_frac * n)` and `floor(valid_frac_cumulative * n)`.
//! The same cut points are exposed both as indices (for raw slices) and as
//! boundary timestamps (for windowing a [`Series`]), and the two views agree.

use crate::core::Series;
use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fractional cut points of a split.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitFractions {
    /// End of the training range as a fraction of the series length.
    pub train: f64,
    /// End of the validation range as a cumulative fraction of the series length.
    pub valid_cumulative: f64,
}

impl Default for SplitFractions {
    fn default() -> Self {
        Self {
            train: 0.70,
            valid_cumulative: 0.85,
        }
    }
}

impl SplitFractions {
    pub fn new(train: f64, valid_cumulative: f64) -> Result<Self> {
        let fractions = Self {
            train,
            valid_cumulative,
        };
        fractions.validate()?;
        Ok(fractions)
    }

    pub fn validate(&self) -> Result<()> {
        let ordered = 0.0 <= self.train
            && self.train <= self.valid_cumulative
            && self.valid_cumulative <= 1.0;
        if !ordered || !self.train.is_finite() || !self.valid_cumulative.is_finite() {
            return Err(ForecastError::InvalidParameter(format!(
                "split fractions must satisfy 0 <= train ({}) <= valid ({}) <= 1",
                self.train, self.valid_cumulative
            )));
        }
        Ok(())
    }

    /// Index cut points `(train_end, validation_end)` for a series of length `n`.
    pub fn cut_points(&self, n: usize) -> (usize, usize) {
        let train_end = ((self.train * n as f64).floor() as usize).min(n);
        let valid_end = ((self.valid_cumulative * n as f64).floor() as usize).clamp(train_end, n);
        (train_end, valid_end)
    }
}

/// Plain index-based split of a raw slice.
pub fn split_slice<T>(values: &[T], fractions: SplitFractions) -> Result<(&[T], &[T], &[T])> {
    fractions.validate()?;
    let (train_end, valid_end) = fractions.cut_points(values.len());
    Ok((
        &values[..train_end],
        &values[train_end..valid_end],
        &values[valid_end..],
    ))
}

/// First timestamps of the validation and test ranges.
///
/// `None` marks a partition that is empty and therefore starts past the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitBoundaries {
    pub validation_start: Option<DateTime<Utc>>,
    pub test_start: Option<DateTime<Utc>>,
}

/// Chronological split of a series into three contiguous views.
#[derive(Debug, Clone)]
pub struct Split {
    train: Series,
    validation: Series,
    test: Series,
    boundaries: SplitBoundaries,
}

impl Split {
    pub fn train(&self) -> &Series {
        &self.train
    }

    pub fn validation(&self) -> &Series {
        &self.validation
    }

    pub fn test(&self) -> &Series {
        &self.test
    }

    /// Train and validation joined into one contiguous view.
    pub fn train_plus_validation(&self) -> Result<Series> {
        self.train.join(&self.validation)
    }

    pub fn boundaries(&self) -> SplitBoundaries {
        self.boundaries
    }

    /// Sizes of the train, validation and test ranges.
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.train.len(), self.validation.len(), self.test.len())
    }
}

/// Split `series` chronologically at the given fractions.
///
/// The caller is responsible for ensuring the series spans enough seasonal
/// cycles for the model it will be used with.
pub fn split(series: &Series, fractions: SplitFractions) -> Result<Split> {
    fractions.validate()?;
    let n = series.len();
    let (train_end, valid_end) = fractions.cut_points(n);
    let timestamps = series.timestamps();

    let boundaries = SplitBoundaries {
        validation_start: timestamps.get(train_end).copied(),
        test_start: timestamps.get(valid_end).copied(),
    };

    Ok(Split {
        train: series.slice(0, train_end)?,
        validation: series.slice(train_end, valid_end)?,
        test: series.slice(valid_end, n)?,
        boundaries,
    })
}

/// Split `series` by boundary timestamps instead of indices.
pub fn split_at(series: &Series, boundaries: SplitBoundaries) -> Result<Split> {
    let end = match series.last_timestamp() {
        Some(last) => last + series.interval(),
        None => return Err(ForecastError::EmptyData),
    };
    let validation_start = boundaries.validation_start.unwrap_or(end);
    let test_start = boundaries.test_start.unwrap_or(end);
    if test_start < validation_start {
        return Err(ForecastError::InvalidParameter(
            "test range must not start before validation range".to_string(),
        ));
    }
    let first = series.first_timestamp().unwrap_or(validation_start);

    Ok(Split {
        train: series.window(first, validation_start),
        validation: series.window(validation_start, test_start),
        test: series.window_from(test_start),
        boundaries,
    })
}
