//! Regularly spaced, seasonally aligned univariate series.
//!
//! A [`Series`] is a view over an immutable, reference-counted backing
//! sequence. Index slicing and timestamp windowing both produce new views
//! over the same backing, so the train/validation/test partitions used by
//! the order search and the final model always agree on their boundaries.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

const SECONDS_PER_DAY: i64 = 86_400;

/// Seasonal alignment of the first observation of a series.
///
/// `slot` is the position of the observation inside its seasonal cycle, so
/// observation `i` of the series falls in season `(slot + i) % period`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartAlignment {
    /// Calendar year of the first observation.
    pub year: i32,
    /// Day of year (1-based) of the first observation.
    pub day_of_year: u32,
    /// Index of the first observation within its seasonal cycle.
    pub slot: usize,
}

impl StartAlignment {
    /// Derive the alignment of `timestamp` for a series sampled every `interval`.
    pub fn from_timestamp(timestamp: DateTime<Utc>, interval: Duration, period: usize) -> Self {
        let step = interval.num_seconds().max(1);
        let since_midnight = i64::from(timestamp.num_seconds_from_midnight());
        let slot = if period == 0 {
            0
        } else {
            ((since_midnight / step) as usize) % period
        };
        Self {
            year: timestamp.year(),
            day_of_year: timestamp.ordinal(),
            slot,
        }
    }

    /// Fractional day-of-year position, e.g. `32.5` for noon on 1 February.
    pub fn fractional_day(&self, period: usize) -> f64 {
        if period == 0 {
            return self.day_of_year as f64;
        }
        self.day_of_year as f64 + self.slot as f64 / period as f64
    }
}

#[derive(Debug)]
struct Backing {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

/// A time-indexed univariate series with a fixed sampling interval and
/// seasonal period.
#[derive(Debug, Clone)]
pub struct Series {
    backing: Arc<Backing>,
    range: Range<usize>,
    period: usize,
    interval: Duration,
}

impl Series {
    /// Create a series, inferring the sampling interval from the timestamps.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<f64>, period: usize) -> Result<Self> {
        Self::with_interval(timestamps, values, period, None)
    }

    /// Create a regular series of `values` starting at `start`.
    pub fn regular(
        start: DateTime<Utc>,
        interval: Duration,
        values: Vec<f64>,
        period: usize,
    ) -> Result<Self> {
        let timestamps = (0..values.len())
            .map(|i| start + interval * i as i32)
            .collect();
        Self::with_interval(timestamps, values, period, Some(interval))
    }

    fn with_interval(
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
        period: usize,
        interval: Option<Duration>,
    ) -> Result<Self> {
        if timestamps.is_empty() {
            return Err(ForecastError::EmptyData);
        }
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        if period == 0 {
            return Err(ForecastError::InvalidParameter(
                "period must be positive".to_string(),
            ));
        }
        for i in 1..timestamps.len() {
            if timestamps[i] <= timestamps[i - 1] {
                return Err(ForecastError::TimestampError(format!(
                    "timestamps must be strictly increasing (position {})",
                    i
                )));
            }
        }

        let interval = match interval {
            Some(interval) if interval > Duration::zero() => interval,
            Some(_) => {
                return Err(ForecastError::InvalidParameter(
                    "interval must be positive".to_string(),
                ))
            }
            None => infer_interval(&timestamps)
                .unwrap_or_else(|| Duration::seconds(SECONDS_PER_DAY / period as i64)),
        };

        let n = timestamps.len();
        Ok(Self {
            backing: Arc::new(Backing { timestamps, values }),
            range: 0..n,
            period,
            interval,
        })
    }

    /// Number of observations in this view.
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.backing.timestamps[self.range.clone()]
    }

    pub fn values(&self) -> &[f64] {
        &self.backing.values[self.range.clone()]
    }

    /// Observations per seasonal cycle.
    pub fn period(&self) -> usize {
        self.period
    }

    /// Nominal spacing between observations.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offset of this view inside its backing sequence.
    pub fn offset(&self) -> usize {
        self.range.start
    }

    pub fn first_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps().first().copied()
    }

    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps().last().copied()
    }

    /// Seasonal alignment of the first observation in this view.
    pub fn start(&self) -> Option<StartAlignment> {
        self.first_timestamp()
            .map(|ts| StartAlignment::from_timestamp(ts, self.interval, self.period))
    }

    /// Season of observation `index` within this view.
    pub fn season_index(&self, index: usize) -> usize {
        let slot = self.start().map(|s| s.slot).unwrap_or(0);
        (slot + index) % self.period
    }

    /// Index-based view `[start, end)` sharing the same backing.
    pub fn slice(&self, start: usize, end: usize) -> Result<Series> {
        if start > end {
            return Err(ForecastError::InvalidParameter(
                "start must be <= end".to_string(),
            ));
        }
        if end > self.len() {
            return Err(ForecastError::IndexOutOfBounds {
                index: end,
                size: self.len(),
            });
        }
        Ok(Series {
            backing: Arc::clone(&self.backing),
            range: self.range.start + start..self.range.start + end,
            period: self.period,
            interval: self.interval,
        })
    }

    /// Timestamp-based view over observations with `from <= t < to`.
    pub fn window(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Series {
        let ts = self.timestamps();
        let start = ts.partition_point(|t| *t < from);
        let end = ts.partition_point(|t| *t < to).max(start);
        Series {
            backing: Arc::clone(&self.backing),
            range: self.range.start + start..self.range.start + end,
            period: self.period,
            interval: self.interval,
        }
    }

    /// View from `from` (inclusive) to the end of this view.
    pub fn window_from(&self, from: DateTime<Utc>) -> Series {
        let start = self.timestamps().partition_point(|t| *t < from);
        Series {
            backing: Arc::clone(&self.backing),
            range: self.range.start + start..self.range.end,
            period: self.period,
            interval: self.interval,
        }
    }

    /// Position of `timestamp` within this view.
    pub fn position_of(&self, timestamp: DateTime<Utc>) -> Option<usize> {
        self.timestamps().binary_search(&timestamp).ok()
    }

    /// Whether two views share the same backing sequence.
    pub fn shares_backing(&self, other: &Series) -> bool {
        Arc::ptr_eq(&self.backing, &other.backing)
    }

    /// Concatenate `other` after `self`.
    ///
    /// Adjacent views over the same backing are joined without copying.
    pub fn join(&self, other: &Series) -> Result<Series> {
        if self.period != other.period {
            return Err(ForecastError::InvalidParameter(format!(
                "cannot join series with periods {} and {}",
                self.period, other.period
            )));
        }
        if self.shares_backing(other) && self.range.end == other.range.start {
            return Ok(Series {
                backing: Arc::clone(&self.backing),
                range: self.range.start..other.range.end,
                period: self.period,
                interval: self.interval,
            });
        }
        if other.is_empty() {
            return Ok(self.clone());
        }
        if self.is_empty() {
            return Ok(other.clone());
        }

        let mut timestamps = self.timestamps().to_vec();
        timestamps.extend_from_slice(other.timestamps());
        let mut values = self.values().to_vec();
        values.extend_from_slice(other.values());
        Series::with_interval(timestamps, values, self.period, Some(self.interval))
    }

    /// Timestamps for `count` observations following the end of this view.
    pub fn future_timestamps(&self, count: usize) -> Vec<DateTime<Utc>> {
        match self.last_timestamp() {
            Some(last) => (1..=count)
                .map(|h| last + self.interval * h as i32)
                .collect(),
            None => Vec::new(),
        }
    }
}

impl PartialEq for Series {
    fn eq(&self, other: &Self) -> bool {
        self.period == other.period
            && self.timestamps() == other.timestamps()
            && self.values() == other.values()
    }
}

/// Modal spacing between consecutive timestamps.
pub fn infer_interval(timestamps: &[DateTime<Utc>]) -> Option<Duration> {
    if timestamps.len() < 2 {
        return None;
    }

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for w in timestamps.windows(2) {
        *counts.entry((w[1] - w[0]).num_seconds()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .max_by(|(da, ca), (db, cb)| ca.cmp(cb).then(db.cmp(da)))
        .map(|(diff, _)| Duration::seconds(diff))
}
