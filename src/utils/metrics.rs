//! Accuracy metrics for forecast evaluation.

use crate::error::{ForecastError, Result};

/// Accuracy metrics for evaluating forecast performance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccuracyMetrics {
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean Squared Error
    pub mse: f64,
    /// Root Mean Squared Error
    pub rmse: f64,
    /// Number of scored positions
    pub n: usize,
}

/// Calculate accuracy metrics between actual and predicted values.
///
/// Positions where either value is NaN or infinite are skipped, so warm-up
/// positions without a prediction do not poison the score.
///
/// # Arguments
/// * `actual` - Actual observed values
/// * `predicted` - Predicted values aligned with `actual`
///
/// # Returns
/// `AccuracyMetrics` over the scored positions, or `EmptyData` if none remain.
pub fn calculate_metrics(actual: &[f64], predicted: &[f64]) -> Result<AccuracyMetrics> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    let mut n = 0usize;
    let mut abs_sum = 0.0;
    let mut sq_sum = 0.0;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        if !a.is_finite() || !p.is_finite() {
            continue;
        }
        let err = a - p;
        abs_sum += err.abs();
        sq_sum += err * err;
        n += 1;
    }

    if n == 0 {
        return Err(ForecastError::EmptyData);
    }

    let mae = abs_sum / n as f64;
    let mse = sq_sum / n as f64;

    Ok(AccuracyMetrics {
        mae,
        mse,
        rmse: mse.sqrt(),
        n,
    })
}

/// Calculate MAE between two slices.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    calculate_metrics(actual, predicted)
        .map(|m| m.mae)
        .unwrap_or(f64::NAN)
}

/// Calculate RMSE between two slices.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    calculate_metrics(actual, predicted)
        .map(|m| m.rmse)
        .unwrap_or(f64::NAN)
}
