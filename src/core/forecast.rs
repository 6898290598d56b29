//! Time-indexed prediction series.

use crate::error::{ForecastError, Result};
use chrono::{DateTime, Utc};

/// Ordered `(timestamp, prediction)` pairs labelled with the producing model.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSeries {
    label: String,
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<f64>,
}

impl ForecastSeries {
    /// Create a forecast series. Timestamps must be strictly increasing.
    pub fn new(
        label: impl Into<String>,
        timestamps: Vec<DateTime<Utc>>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::DimensionMismatch {
                expected: timestamps.len(),
                got: values.len(),
            });
        }
        if timestamps.windows(2).any(|w| w[1] <= w[0]) {
            return Err(ForecastError::TimestampError(
                "forecast timestamps must be strictly increasing".to_string(),
            ));
        }
        Ok(Self {
            label: label.into(),
            timestamps,
            values,
        })
    }

    /// Model identifier used as the value column name.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, f64)> + '_ {
        self.timestamps.iter().copied().zip(self.values.iter().copied())
    }
}
