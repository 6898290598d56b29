//! Forecaster trait defining the common interface for models.

use crate::core::{ForecastSeries, Series};
use crate::error::Result;

/// Common interface for forecasting models.
///
/// This trait is object-safe and can be used with `Box<dyn Forecaster>`.
pub trait Forecaster {
    /// Estimate the model's parameters from the series.
    fn fit(&mut self, series: &Series) -> Result<()>;

    /// Recursive multi-step forecast continuing the last fitted series.
    fn predict(&self, horizon: usize) -> Result<ForecastSeries>;

    /// In-sample one-step-ahead predictions aligned with the fitted series.
    fn fitted_values(&self) -> Option<&[f64]>;

    /// Residuals (actual - fitted) aligned with the fitted series.
    fn residuals(&self) -> Option<&[f64]>;

    /// Get the model name.
    fn name(&self) -> &str;

    /// Check if the model has been fitted.
    fn is_fitted(&self) -> bool {
        self.fitted_values().is_some()
    }
}
