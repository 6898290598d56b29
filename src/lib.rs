//! # imbalance-forecast
//!
//! Seasonal ARIMA forecasting for half-hourly grid imbalance series.
//!
//! The crate loads a timestamped series, splits it chronologically into
//! train / validation / test ranges, searches a grid of SARIMA orders in
//! parallel by validation error, fits the chosen order on train + validation,
//! and produces one-step-ahead forecasts over the test range by re-applying
//! the estimated coefficients without re-estimation.

#![allow(clippy::upper_case_acronyms)]
#![allow(clippy::needless_range_loop)]

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod search;
pub mod split;
pub mod utils;
pub mod validation;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::config::PipelineConfig;
    pub use crate::core::{ForecastSeries, Series};
    pub use crate::error::{ForecastError, Result};
    pub use crate::models::arima::{CandidateOrder, SarimaOrder, SARIMA};
    pub use crate::models::Forecaster;
    pub use crate::search::{search, OrderGrid, SearchOptions, SearchProgress, SearchTable};
    pub use crate::split::{split, Split, SplitFractions};
    pub use crate::utils::{calculate_metrics, AccuracyMetrics};
}
