//! Differencing utilities for seasonal ARIMA models.
//!
//! The combined operator `(1-B)^d (1-B^s)^D` is expanded once into a lag
//! polynomial. Differencing and integration both go through that expansion,
//! so a one-step prediction on the differenced scale maps back onto the
//! original scale with the same arithmetic in both directions.

/// Multiply two lag polynomials given by their coefficients `[c0, c1, ...]`.
pub fn poly_mul(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return vec![];
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, x) in a.iter().enumerate() {
        if *x == 0.0 {
            continue;
        }
        for (j, y) in b.iter().enumerate() {
            out[i + j] += x * y;
        }
    }
    out
}

/// Integration weights `delta` of the differencing operator.
///
/// With `K = delta.len() = d + s*D`, the original series satisfies
/// `y_t = w_t + sum_{k=1..K} delta[k-1] * y_{t-k}` where `w` is the
/// differenced series.
pub fn integration_weights(d: usize, seasonal_d: usize, period: usize) -> Vec<f64> {
    let mut poly = vec![1.0];
    for _ in 0..d {
        poly = poly_mul(&poly, &[1.0, -1.0]);
    }
    if period > 0 {
        let mut seasonal = vec![0.0; period + 1];
        seasonal[0] = 1.0;
        seasonal[period] = -1.0;
        for _ in 0..seasonal_d {
            poly = poly_mul(&poly, &seasonal);
        }
    }
    poly[1..].iter().map(|c| -c).collect()
}

/// Apply the differencing operator described by `delta` to `series`.
///
/// The result has `series.len() - delta.len()` elements; element `i`
/// corresponds to original position `i + delta.len()`.
pub fn apply_difference(series: &[f64], delta: &[f64]) -> Vec<f64> {
    let k = delta.len();
    if series.len() <= k {
        return vec![];
    }
    (k..series.len())
        .map(|t| series[t] - lagged_sum(&series[..t], delta))
        .collect()
}

/// Map a differenced-scale value at the next position back onto the
/// original scale, given the original history preceding it.
pub fn integrate_next(history: &[f64], delta: &[f64], differenced: f64) -> f64 {
    differenced + lagged_sum(history, delta)
}

/// `sum_{k=1..K} delta[k-1] * history[len - k]`.
fn lagged_sum(history: &[f64], delta: &[f64]) -> f64 {
    let len = history.len();
    delta
        .iter()
        .enumerate()
        .filter(|(_, c)| **c != 0.0)
        .map(|(k, c)| c * history[len - 1 - k])
        .sum()
}

/// Apply ordinary differencing `d` times.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return vec![];
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Apply seasonal differencing at lag `period`, `d` times.
pub fn seasonal_difference(series: &[f64], d: usize, period: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    if period == 0 {
        return result;
    }
    for _ in 0..d {
        if result.len() <= period {
            return vec![];
        }
        result = result
            .iter()
            .skip(period)
            .zip(result.iter())
            .map(|(curr, prev)| curr - prev)
            .collect();
    }
    result
}
