//! SARIMA (Seasonal Autoregressive Integrated Moving Average) model.

use crate::core::{ForecastSeries, Series};
use crate::error::{ForecastError, Result};
use crate::models::arima::diff::{apply_difference, integrate_next, integration_weights, poly_mul};
use crate::models::arima::order::SarimaOrder;
use crate::models::Forecaster;
use crate::utils::optimization::{nelder_mead, NelderMeadConfig};
use crate::utils::stats::mean;
use crate::validation::{ljung_box, LjungBoxResult};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

const COEFFICIENT_BOUND: f64 = 0.99;

/// Optimizer settings for parameter estimation.
#[derive(Debug, Clone)]
pub struct FitOptions {
    /// Maximum Nelder-Mead iterations.
    pub max_iter: usize,
    /// Convergence tolerance on the log CSS objective.
    pub tolerance: f64,
    /// Wall-clock budget for a single estimation.
    pub time_budget: Option<Duration>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iter: 5000,
            tolerance: 1e-8,
            time_budget: None,
        }
    }
}

impl FitOptions {
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }
}

/// Estimated SARIMA coefficients.
///
/// AR coefficients weight past deviations from the mean; MA coefficients
/// weight past innovations. Both enter with a positive sign.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SarimaParams {
    pub order: SarimaOrder,
    /// Mean of the differenced series (zero when differencing is applied).
    pub mean: f64,
    pub ar: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
    /// Innovation variance.
    pub sigma2: f64,
}

impl SarimaParams {
    /// Unpack an optimizer vector laid out as `[mean?, ar, sar, ma, sma]`.
    fn from_vector(order: SarimaOrder, v: &[f64]) -> Self {
        let mut pos = 0;
        let mut take = |count: usize| {
            let out = v[pos..pos + count].to_vec();
            pos += count;
            out
        };
        let mean = if order.includes_mean() {
            take(1)[0]
        } else {
            0.0
        };
        let ar = take(order.p);
        let seasonal_ar = take(order.cap_p);
        let ma = take(order.q);
        let seasonal_ma = take(order.cap_q);
        Self {
            order,
            mean,
            ar,
            seasonal_ar,
            ma,
            seasonal_ma,
            sigma2: f64::NAN,
        }
    }

    /// Coefficients of `phi(B) Phi(B^s)` as predictor weights for lags 1..=ar_lag.
    pub fn expanded_ar(&self) -> Vec<f64> {
        let regular = lag_polynomial(&self.ar, 1, -1.0);
        let seasonal = lag_polynomial(&self.seasonal_ar, self.order.seasonal_lag(), -1.0);
        poly_mul(&regular, &seasonal)[1..].iter().map(|c| -c).collect()
    }

    /// Coefficients of `theta(B) Theta(B^s)` for lags 1..=ma_lag.
    pub fn expanded_ma(&self) -> Vec<f64> {
        let regular = lag_polynomial(&self.ma, 1, 1.0);
        let seasonal = lag_polynomial(&self.seasonal_ma, self.order.seasonal_lag(), 1.0);
        poly_mul(&regular, &seasonal)[1..].to_vec()
    }
}

/// `1 + sign * sum c_i B^{step * i}`.
fn lag_polynomial(coefs: &[f64], step: usize, sign: f64) -> Vec<f64> {
    if coefs.is_empty() || step == 0 {
        return vec![1.0];
    }
    let mut poly = vec![0.0; coefs.len() * step + 1];
    poly[0] = 1.0;
    for (i, c) in coefs.iter().enumerate() {
        poly[(i + 1) * step] = sign * c;
    }
    poly
}

/// Non-zero `(lag, weight)` pairs of an expanded polynomial.
fn sparse(weights: &[f64]) -> Vec<(usize, f64)> {
    weights
        .iter()
        .enumerate()
        .filter(|(_, w)| **w != 0.0)
        .map(|(i, w)| (i + 1, *w))
        .collect()
}

/// ARMA prediction of `w[t]` from values and innovations strictly before `t`.
///
/// Lags reaching before the start of the series contribute nothing.
fn predict_at(w: &[f64], e: &[f64], t: usize, mu: f64, ar: &[(usize, f64)], ma: &[(usize, f64)]) -> f64 {
    let mut pred = mu;
    for &(lag, phi) in ar {
        if lag <= t {
            pred += phi * (w[t - lag] - mu);
        }
    }
    for &(lag, theta) in ma {
        if lag <= t {
            pred += theta * e[t - lag];
        }
    }
    pred
}

/// One-step innovations of the ARMA recursion over `w`.
fn innovations(w: &[f64], mu: f64, ar: &[(usize, f64)], ma: &[(usize, f64)]) -> Vec<f64> {
    let mut e = vec![0.0; w.len()];
    for t in 0..w.len() {
        e[t] = w[t] - predict_at(w, &e, t, mu, ar, ma);
    }
    e
}

/// Conditional sum of squares, skipping the first `skip` innovations.
fn conditional_css(e: &[f64], skip: usize) -> f64 {
    e.iter().skip(skip).map(|x| x * x).sum()
}

/// Diagnostics of a parameter estimation run.
#[derive(Debug, Clone)]
pub struct FitDiagnostics {
    /// Conditional sum of squared innovations.
    pub css: f64,
    /// Innovations entering the conditional sum.
    pub n_used: usize,
    /// Gaussian log-likelihood at the CSS estimate.
    pub log_likelihood: f64,
    /// Akaike information criterion, `-2 logL + 2k` with `k` including the variance.
    pub aic: f64,
    /// Bayesian information criterion, `-2 logL + k ln(n_used)`.
    pub bic: f64,
    pub iterations: usize,
    /// Ljung-Box test on the conditional innovations.
    pub ljung_box: LjungBoxResult,
}

/// Result of running the recursion with fixed coefficients over a series.
#[derive(Debug, Clone)]
struct FilterState {
    series: Series,
    differenced: Vec<f64>,
    innovations: Vec<f64>,
    fitted: Vec<f64>,
    residuals: Vec<f64>,
}

/// Seasonal ARIMA forecasting model.
///
/// SARIMA(p, d, q)(P, D, Q)\[s\] combines:
/// - ordinary and seasonal differencing `(1-B)^d (1-B^s)^D`
/// - a multiplicative AR polynomial `phi(B) Phi(B^s)`
/// - a multiplicative MA polynomial `theta(B) Theta(B^s)`
///
/// Parameters are estimated by conditional sum of squares. An estimated
/// model can be re-applied to any other series with [`SARIMA::apply`],
/// which reruns the recursion without re-estimating anything.
#[derive(Debug, Clone)]
pub struct SARIMA {
    order: SarimaOrder,
    options: FitOptions,
    params: Option<SarimaParams>,
    state: Option<FilterState>,
    diagnostics: Option<FitDiagnostics>,
}

impl SARIMA {
    /// Create an unfitted model of the given order.
    pub fn new(order: SarimaOrder) -> Self {
        Self::with_options(order, FitOptions::default())
    }

    pub fn with_options(order: SarimaOrder, options: FitOptions) -> Self {
        Self {
            order,
            options,
            params: None,
            state: None,
            diagnostics: None,
        }
    }

    /// Create a model carrying previously estimated coefficients.
    pub fn from_params(params: SarimaParams) -> Self {
        Self {
            order: params.order,
            options: FitOptions::default(),
            params: Some(params),
            state: None,
            diagnostics: None,
        }
    }

    pub fn order(&self) -> SarimaOrder {
        self.order
    }

    /// Estimated coefficients, once fitted.
    pub fn params(&self) -> Option<&SarimaParams> {
        self.params.as_ref()
    }

    /// Estimation diagnostics, available after [`Forecaster::fit`].
    pub fn diagnostics(&self) -> Option<&FitDiagnostics> {
        self.diagnostics.as_ref()
    }

    /// The series the recursion was last run over.
    pub fn series(&self) -> Option<&Series> {
        self.state.as_ref().map(|s| &s.series)
    }

    pub fn aic(&self) -> Option<f64> {
        self.diagnostics.as_ref().map(|d| d.aic)
    }

    pub fn bic(&self) -> Option<f64> {
        self.diagnostics.as_ref().map(|d| d.bic)
    }

    /// Apply this model's coefficients to `series` without re-estimation.
    ///
    /// The returned model shares the coefficients and exposes fitted values
    /// and residuals over `series`.
    pub fn apply(&self, series: &Series) -> Result<SARIMA> {
        let params = self.params.as_ref().ok_or(ForecastError::FitRequired)?;
        let state = run_filter(series, params)?;
        Ok(SARIMA {
            order: self.order,
            options: self.options.clone(),
            params: Some(params.clone()),
            state: Some(state),
            diagnostics: None,
        })
    }

    fn check_estimable(&self, values: &[f64]) -> Result<()> {
        self.order.validate()?;
        let needed =
            self.order.differencing_lag() + self.order.ar_lag() + self.order.num_params() + 2;
        if values.len() < needed {
            return Err(ForecastError::InsufficientData {
                needed,
                got: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ForecastError::ComputationError(
                "series contains missing or infinite values".to_string(),
            ));
        }
        Ok(())
    }

    fn estimate(&self, w: &[f64]) -> Result<(SarimaParams, usize)> {
        let order = self.order;
        let skip = order.ar_lag();
        let w_mean = mean(w);

        let arma_terms = order.p + order.q + order.cap_p + order.cap_q;
        if arma_terms == 0 {
            let mut params = SarimaParams::from_vector(order, &[w_mean]);
            params.mean = if order.includes_mean() { w_mean } else { 0.0 };
            return Ok((params, 0));
        }

        let mut initial = Vec::with_capacity(order.num_params());
        let mut bounds = Vec::with_capacity(order.num_params());
        if order.includes_mean() {
            initial.push(w_mean);
            bounds.push((f64::NEG_INFINITY, f64::INFINITY));
        }
        for count in [order.p, order.cap_p, order.q, order.cap_q] {
            for i in 0..count {
                initial.push(0.1 / (i + 1) as f64);
                bounds.push((-COEFFICIENT_BOUND, COEFFICIENT_BOUND));
            }
        }

        let config = NelderMeadConfig {
            max_iter: self.options.max_iter,
            tolerance: self.options.tolerance,
            max_duration: self.options.time_budget,
            ..Default::default()
        };

        let started = Instant::now();
        let result = nelder_mead(
            |v| {
                let params = SarimaParams::from_vector(order, v);
                let ar = sparse(&params.expanded_ar());
                let ma = sparse(&params.expanded_ma());
                let e = innovations(w, params.mean, &ar, &ma);
                let css = conditional_css(&e, skip);
                0.5 * (css.max(f64::MIN_POSITIVE) / (w.len() - skip) as f64).ln()
            },
            &initial,
            Some(&bounds),
            config,
        );

        if result.timed_out {
            return Err(ForecastError::Timeout {
                seconds: started.elapsed().as_secs_f64(),
            });
        }
        if !result.optimal_value.is_finite() {
            return Err(ForecastError::Convergence(format!(
                "SARIMA{} objective is not finite",
                order
            )));
        }
        if !result.converged {
            return Err(ForecastError::Convergence(format!(
                "SARIMA{} did not converge after {} iterations",
                order, result.iterations
            )));
        }

        Ok((
            SarimaParams::from_vector(order, &result.optimal_point),
            result.iterations,
        ))
    }
}

/// Run the SARIMA recursion with fixed coefficients over `series`.
fn run_filter(series: &Series, params: &SarimaParams) -> Result<FilterState> {
    let order = params.order;
    order.validate()?;
    let lengths = [
        (params.ar.len(), order.p),
        (params.seasonal_ar.len(), order.cap_p),
        (params.ma.len(), order.q),
        (params.seasonal_ma.len(), order.cap_q),
    ];
    if let Some(&(got, expected)) = lengths.iter().find(|(got, expected)| got != expected) {
        return Err(ForecastError::DimensionMismatch { expected, got });
    }

    let values = series.values();
    let k = order.differencing_lag();
    if values.len() <= k {
        return Err(ForecastError::InsufficientData {
            needed: k + 1,
            got: values.len(),
        });
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(ForecastError::ComputationError(
            "series contains missing or infinite values".to_string(),
        ));
    }

    let delta = integration_weights(order.d, order.cap_d, order.seasonal_lag());
    let differenced = apply_difference(values, &delta);
    let ar = sparse(&params.expanded_ar());
    let ma = sparse(&params.expanded_ma());
    let e = innovations(&differenced, params.mean, &ar, &ma);

    let mut fitted = vec![f64::NAN; values.len()];
    let mut residuals = vec![f64::NAN; values.len()];
    for (i, innovation) in e.iter().enumerate() {
        fitted[i + k] = values[i + k] - innovation;
        residuals[i + k] = *innovation;
    }

    Ok(FilterState {
        series: series.clone(),
        differenced,
        innovations: e,
        fitted,
        residuals,
    })
}

impl Forecaster for SARIMA {
    fn fit(&mut self, series: &Series) -> Result<()> {
        let values = series.values();
        self.check_estimable(values)?;

        let order = self.order;
        let delta = integration_weights(order.d, order.cap_d, order.seasonal_lag());
        let w = apply_difference(values, &delta);

        let (lo, hi) = w
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(*x), hi.max(*x))
            });
        if hi - lo == 0.0 {
            return Err(ForecastError::ComputationError(
                "differenced series is constant".to_string(),
            ));
        }

        let (mut params, iterations) = self.estimate(&w)?;
        let state = run_filter(series, &params)?;

        let skip = order.ar_lag();
        let n_used = state.innovations.len() - skip;
        let css = conditional_css(&state.innovations, skip);
        let sigma2 = css / n_used as f64;
        params.sigma2 = sigma2;

        let log_likelihood =
            -0.5 * n_used as f64 * (1.0 + (2.0 * std::f64::consts::PI * sigma2).ln());
        let k = (order.num_params() + 1) as f64;
        let lb_lags = if order.is_seasonal() {
            Some((2 * order.period).min(n_used / 5).max(1))
        } else {
            None
        };
        let arma_terms = order.p + order.q + order.cap_p + order.cap_q;
        let diagnostics = FitDiagnostics {
            css,
            n_used,
            log_likelihood,
            aic: -2.0 * log_likelihood + 2.0 * k,
            bic: -2.0 * log_likelihood + k * (n_used as f64).ln(),
            iterations,
            ljung_box: ljung_box(&state.innovations[skip..], lb_lags, arma_terms),
        };

        debug!(
            order = %order,
            iterations,
            css,
            aic = diagnostics.aic,
            "estimated SARIMA coefficients"
        );

        self.params = Some(params);
        self.state = Some(state);
        self.diagnostics = Some(diagnostics);
        Ok(())
    }

    fn predict(&self, horizon: usize) -> Result<ForecastSeries> {
        let params = self.params.as_ref().ok_or(ForecastError::FitRequired)?;
        let state = self.state.as_ref().ok_or(ForecastError::FitRequired)?;

        let delta = integration_weights(
            params.order.d,
            params.order.cap_d,
            params.order.seasonal_lag(),
        );
        let ar = sparse(&params.expanded_ar());
        let ma = sparse(&params.expanded_ma());

        let mut w = state.differenced.clone();
        let mut e = state.innovations.clone();
        let mut y = state.series.values().to_vec();
        let mut predictions = Vec::with_capacity(horizon);

        for _ in 0..horizon {
            let t = w.len();
            let next_w = predict_at(&w, &e, t, params.mean, &ar, &ma);
            let next_y = integrate_next(&y, &delta, next_w);
            w.push(next_w);
            e.push(0.0);
            y.push(next_y);
            predictions.push(next_y);
        }

        ForecastSeries::new(
            self.name(),
            state.series.future_timestamps(horizon),
            predictions,
        )
    }

    fn fitted_values(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.fitted.as_slice())
    }

    fn residuals(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.residuals.as_slice())
    }

    fn name(&self) -> &str {
        "SARIMA"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn make_series(values: Vec<f64>, period: usize) -> Series {
        let start = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        Series::regular(start, chrono::Duration::minutes(30), values, period).unwrap()
    }

    fn seasonal_values(n: usize, period: usize, seed: u64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..n)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * (i % period) as f64 / period as f64;
                10.0 + 5.0 * phase.sin() + 0.05 * i as f64 + rng.gen_range(-1.0..1.0)
            })
            .collect()
    }

    fn same_or_both_nan(a: &[f64], b: &[f64]) -> bool {
        a.len() == b.len()
            && a.iter()
                .zip(b)
                .all(|(x, y)| (x.is_nan() && y.is_nan()) || x == y)
    }

    #[test]
    fn sarima_recovers_ar1_coefficient() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut values = vec![0.0];
        for i in 1..600 {
            values.push(0.6 * values[i - 1] + rng.gen_range(-1.0..1.0));
        }
        let series = make_series(values, 48);

        let mut model = SARIMA::new(SarimaOrder::non_seasonal(1, 0, 0));
        model.fit(&series).unwrap();

        let params = model.params().unwrap();
        assert!((params.ar[0] - 0.6).abs() < 0.1, "phi = {}", params.ar[0]);
        assert!(params.mean.abs() < 0.3);
        assert!(params.sigma2 > 0.0);
    }

    #[test]
    fn sarima_seasonal_fit_produces_fitted_values() {
        let series = make_series(seasonal_values(240, 12, 1), 12);
        let order = SarimaOrder::new((1, 0, 0), (0, 1, 1), 12);
        let mut model = SARIMA::new(order);
        model.fit(&series).unwrap();

        let fitted = model.fitted_values().unwrap();
        assert_eq!(fitted.len(), 240);
        assert!(fitted[..12].iter().all(|v| v.is_nan()));
        assert!(fitted[12..].iter().all(|v| v.is_finite()));

        let params = model.params().unwrap();
        assert_eq!(params.seasonal_ma.len(), 1);
        assert!(params.seasonal_ma[0] < 0.0);
        assert_eq!(params.mean, 0.0);
    }

    #[test]
    fn apply_on_estimation_series_reproduces_fitted_values() {
        let series = make_series(seasonal_values(200, 8, 3), 8);
        let mut model = SARIMA::new(SarimaOrder::new((1, 1, 0), (0, 1, 1), 8));
        model.fit(&series).unwrap();

        let reapplied = model.apply(&series).unwrap();
        assert!(same_or_both_nan(
            model.fitted_values().unwrap(),
            reapplied.fitted_values().unwrap()
        ));
        assert!(same_or_both_nan(
            model.residuals().unwrap(),
            reapplied.residuals().unwrap()
        ));
        assert_eq!(model.params(), reapplied.params());
    }

    #[test]
    fn one_step_fitted_value_matches_native_forecast() {
        let full = make_series(seasonal_values(260, 12, 9), 12);
        let head = full.slice(0, 220).unwrap();

        let mut model = SARIMA::new(SarimaOrder::new((1, 1, 1), (0, 1, 1), 12));
        model.fit(&head).unwrap();

        let native = model.predict(1).unwrap();
        let applied = model.apply(&full).unwrap();
        let fitted = applied.fitted_values().unwrap();

        assert_eq!(native.timestamps()[0], full.timestamps()[220]);
        assert_relative_eq!(native.values()[0], fitted[220], epsilon = 1e-9, max_relative = 1e-9);
    }

    #[test]
    fn fixed_params_model_applies_without_estimation() {
        let series = make_series(seasonal_values(100, 4, 5), 4);
        let params = SarimaParams {
            order: SarimaOrder::new((1, 0, 0), (0, 1, 0), 4),
            mean: 0.0,
            ar: vec![0.5],
            seasonal_ar: vec![],
            ma: vec![],
            seasonal_ma: vec![],
            sigma2: 1.0,
        };
        let model = SARIMA::from_params(params);
        assert!(!model.is_fitted());

        let applied = model.apply(&series).unwrap();
        let values = series.values();
        let fitted = applied.fitted_values().unwrap();
        // w_t = y_t - y_{t-4}; first differenced value has no AR lag.
        assert_relative_eq!(fitted[4], values[0], epsilon = 1e-12);
        let w_prev = values[4] - values[0];
        assert_relative_eq!(fitted[5], values[1] + 0.5 * w_prev, epsilon = 1e-12);
    }

    #[test]
    fn expanded_polynomials_multiply_seasonal_factors() {
        let params = SarimaParams {
            order: SarimaOrder::new((1, 0, 1), (1, 0, 1), 4),
            mean: 0.0,
            ar: vec![0.5],
            seasonal_ar: vec![0.4],
            ma: vec![0.3],
            seasonal_ma: vec![0.2],
            sigma2: 1.0,
        };
        // (1 - 0.5B)(1 - 0.4B^4) = 1 - 0.5B - 0.4B^4 + 0.2B^5
        let ar = params.expanded_ar();
        assert_eq!(ar.len(), 5);
        assert_relative_eq!(ar[0], 0.5);
        assert_relative_eq!(ar[3], 0.4);
        assert_relative_eq!(ar[4], -0.2, epsilon = 1e-12);
        // (1 + 0.3B)(1 + 0.2B^4) = 1 + 0.3B + 0.2B^4 + 0.06B^5
        let ma = params.expanded_ma();
        assert_relative_eq!(ma[0], 0.3);
        assert_relative_eq!(ma[3], 0.2);
        assert_relative_eq!(ma[4], 0.06, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_fails() {
        let series = make_series(vec![5.0; 120], 12);
        let mut model = SARIMA::new(SarimaOrder::new((1, 0, 0), (0, 1, 0), 12));
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::ComputationError(_))
        ));
    }

    #[test]
    fn excessive_differencing_fails() {
        let series = make_series(seasonal_values(200, 12, 2), 12);
        let mut model = SARIMA::new(SarimaOrder::new((0, 2, 1), (0, 1, 0), 12));
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn insufficient_data_fails() {
        let series = make_series(seasonal_values(20, 12, 2), 12);
        let mut model = SARIMA::new(SarimaOrder::new((1, 1, 1), (1, 1, 1), 12));
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::InsufficientData { .. })
        ));
    }

    #[test]
    fn zero_time_budget_times_out() {
        let series = make_series(seasonal_values(200, 12, 4), 12);
        let options = FitOptions::default().with_time_budget(Duration::ZERO);
        let mut model = SARIMA::with_options(SarimaOrder::new((1, 0, 1), (0, 1, 1), 12), options);
        assert!(matches!(
            model.fit(&series),
            Err(ForecastError::Timeout { .. })
        ));
    }

    #[test]
    fn requires_fit() {
        let model = SARIMA::new(SarimaOrder::non_seasonal(1, 1, 1));
        assert!(matches!(model.predict(3), Err(ForecastError::FitRequired)));
        let series = make_series(seasonal_values(50, 12, 1), 12);
        assert!(matches!(
            model.apply(&series),
            Err(ForecastError::FitRequired)
        ));
    }

    #[test]
    fn predict_continues_timestamps() {
        let series = make_series(seasonal_values(120, 12, 6), 12);
        let mut model = SARIMA::new(SarimaOrder::new((1, 0, 0), (0, 1, 0), 12));
        model.fit(&series).unwrap();

        let forecast = model.predict(5).unwrap();
        assert_eq!(forecast.len(), 5);
        assert_eq!(forecast.label(), "SARIMA");
        assert_eq!(forecast.timestamps(), series.future_timestamps(5).as_slice());
        assert!(forecast.values().iter().all(|v| v.is_finite()));
        assert!(model.predict(0).unwrap().is_empty());
    }

    #[test]
    fn diagnostics_are_reported() {
        let series = make_series(seasonal_values(240, 12, 8), 12);
        let mut model = SARIMA::new(SarimaOrder::new((1, 0, 0), (0, 1, 1), 12));
        model.fit(&series).unwrap();

        let diag = model.diagnostics().unwrap();
        assert_eq!(diag.n_used, 240 - 12 - 1);
        assert!(diag.aic.is_finite());
        assert!(diag.bic > diag.aic);
        assert!(diag.ljung_box.statistic.is_finite());
        assert_eq!(model.aic(), Some(diag.aic));
    }

    #[test]
    fn random_walk_needs_no_optimizer() {
        let series = make_series(seasonal_values(60, 12, 11), 12);
        let mut model = SARIMA::new(SarimaOrder::non_seasonal(0, 1, 0));
        model.fit(&series).unwrap();
        let diag = model.diagnostics().unwrap();
        assert_eq!(diag.iterations, 0);
        let fitted = model.fitted_values().unwrap();
        // Without ARMA terms each prediction is the previous observation.
        assert_relative_eq!(fitted[10], series.values()[9], epsilon = 1e-12);
    }
}
