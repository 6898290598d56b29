//! Statistical utility functions.

/// Calculate the mean of a slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Lag-`k` sample autocorrelation.
pub fn autocorrelation(values: &[f64], k: usize) -> f64 {
    let n = values.len();
    if k >= n {
        return f64::NAN;
    }
    let m = mean(values);
    let denom: f64 = values.iter().map(|x| (x - m).powi(2)).sum();
    if denom == 0.0 {
        return 0.0;
    }
    let num: f64 = values
        .iter()
        .skip(k)
        .zip(values.iter())
        .map(|(a, b)| (a - m) * (b - m))
        .sum();
    num / denom
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_of_values() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(mean(&values), 5.0);
        assert!(mean(&[]).is_nan());
    }

    #[test]
    fn autocorrelation_of_alternating_series_is_negative() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }).collect();
        assert!(autocorrelation(&values, 1) < -0.9);
        assert!(autocorrelation(&values, 2) > 0.8);
        assert_eq!(autocorrelation(&[3.0; 5], 1), 0.0);
        assert!(autocorrelation(&values, 20).is_nan());
    }
}
