//! Utility functions for forecasting models.

pub mod metrics;
pub mod optimization;
pub mod stats;

pub use metrics::{calculate_metrics, mae, rmse, AccuracyMetrics};
pub use optimization::{nelder_mead, NelderMeadConfig, NelderMeadResult};
pub use stats::{autocorrelation, mean};
