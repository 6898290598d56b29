//! Seasonal ARIMA (Autoregressive Integrated Moving Average) models.
//!
//! This module provides:
//! - SARIMA(p, d, q)(P, D, Q)\[s\] estimation by conditional sum of squares
//! - re-application of estimated coefficients to a new series
//! - differencing and integration through the expanded lag polynomial

mod diff;
mod model;
mod order;

pub use diff::{
    apply_difference, difference, integrate_next, integration_weights, poly_mul,
    seasonal_difference,
};
pub use model::{FitDiagnostics, FitOptions, SarimaParams, SARIMA};
pub use order::{parse_triple, CandidateOrder, SarimaOrder, MAX_TOTAL_DIFFERENCING};
