//! Core data structures for the imbalance series and its forecasts.

mod forecast;
mod time_series;

pub use forecast::ForecastSeries;
pub use time_series::{infer_interval, Series, StartAlignment};
