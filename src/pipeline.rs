//! End-to-end stages: split, search, final fit, one-step forecast.
//!
//! The final fit is estimated once on train + validation. The test-range
//! forecast is then produced by re-applying those coefficients to the full
//! series, so every prediction conditions on the true observations up to the
//! preceding timestamp. The first test prediction must agree with the
//! model's own single-step forecast from the end of train + validation.

use crate::config::PipelineConfig;
use crate::core::{ForecastSeries, Series};
use crate::error::{ForecastError, Result};
use crate::models::arima::{FitOptions, SarimaOrder, SARIMA};
use crate::models::Forecaster;
use crate::search::{search, SearchProgress, SearchTable};
use crate::split::{split, Split};
use tracing::info;

/// Minimum number of seasonal cycles a series must span.
pub const MIN_SEASONAL_CYCLES: usize = 2;

/// Relative tolerance of the one-step cross-check.
pub const CROSS_CHECK_TOLERANCE: f64 = 1e-8;

/// Reject series too short for seasonal modelling at `period`.
pub fn ensure_min_length(series: &Series, period: usize) -> Result<()> {
    let needed = MIN_SEASONAL_CYCLES * period.max(1);
    if series.len() < needed {
        return Err(ForecastError::InsufficientData {
            needed,
            got: series.len(),
        });
    }
    Ok(())
}

/// Validate the length of `series` and split it as configured.
pub fn prepare_split(series: &Series, config: &PipelineConfig) -> Result<Split> {
    ensure_min_length(series, config.period)?;
    let parts = split(series, config.fractions()?)?;
    let (train, validation, test) = parts.sizes();
    info!(train, validation, test, "split series");
    Ok(parts)
}

/// Estimate `order` on `series`; any estimation failure is a convergence error.
pub fn fit_final(series: &Series, order: SarimaOrder, options: &FitOptions) -> Result<SARIMA> {
    order.validate()?;
    let mut model = SARIMA::with_options(order, options.clone());
    model.fit(series).map_err(|e| match e {
        ForecastError::Convergence(_) => e,
        other => ForecastError::Convergence(format!(
            "final fit of SARIMA{} failed: {}",
            order, other
        )),
    })?;
    if let Some(diag) = model.diagnostics() {
        info!(
            order = %order,
            observations = series.len(),
            aic = diag.aic,
            ljung_box_p = diag.ljung_box.p_value,
            "final model estimated"
        );
    }
    Ok(model)
}

/// One-step-ahead predictions of `model` over the `target` sub-range of `full`.
///
/// The coefficients are re-applied to `full` without re-estimation and the
/// fitted values at the timestamps of `target` are returned under `label`.
pub fn forecast_one_step(
    full: &Series,
    model: &SARIMA,
    target: &Series,
    label: &str,
) -> Result<ForecastSeries> {
    let first = target.first_timestamp().ok_or(ForecastError::EmptyData)?;
    let start = full.position_of(first).ok_or_else(|| {
        ForecastError::TimestampError(format!("{} is not part of the series", first))
    })?;
    let end = start + target.len();
    if end > full.len() || full.timestamps()[start..end] != *target.timestamps() {
        return Err(ForecastError::TimestampError(
            "forecast range is not a contiguous part of the series".to_string(),
        ));
    }

    let applied = model.apply(full)?;
    let fitted = applied.fitted_values().ok_or(ForecastError::FitRequired)?;
    ForecastSeries::new(
        label,
        target.timestamps().to_vec(),
        fitted[start..end].to_vec(),
    )
}

/// Compare the first one-step prediction with the model's native forecast.
///
/// `model` must be the one estimated on the data ending right before the
/// forecast range. Returns the native value on success.
pub fn cross_check(model: &SARIMA, forecast: &ForecastSeries) -> Result<f64> {
    let native = model.predict(1)?;
    let (native_ts, native_value) = native.iter().next().ok_or(ForecastError::EmptyData)?;
    let (first_ts, first_value) = forecast.iter().next().ok_or(ForecastError::EmptyData)?;

    if native_ts != first_ts {
        return Err(ForecastError::TimestampError(format!(
            "forecast starts at {} but the fitted data ends before {}",
            first_ts, native_ts
        )));
    }
    let scale = 1.0 + native_value.abs();
    if !((first_value - native_value).abs() <= CROSS_CHECK_TOLERANCE * scale) {
        return Err(ForecastError::ComputationError(format!(
            "one-step forecast {} disagrees with native forecast {} at {}",
            first_value, native_value, first_ts
        )));
    }
    Ok(native_value)
}

/// Output of [`run_search`].
#[derive(Debug, Clone)]
pub struct SearchRun {
    pub split: Split,
    pub table: SearchTable,
}

/// Split `series` and search the configured grid.
pub fn run_search(
    series: &Series,
    config: &PipelineConfig,
    progress: &dyn SearchProgress,
) -> Result<SearchRun> {
    let parts = prepare_split(series, config)?;
    let table = search(
        parts.train(),
        parts.validation(),
        &config.grid,
        config.period,
        &config.search_options(),
        progress,
    )?;
    Ok(SearchRun {
        split: parts,
        table,
    })
}

/// Output of [`run_forecast`].
#[derive(Debug, Clone)]
pub struct ForecastRun {
    pub model: SARIMA,
    pub forecast: ForecastSeries,
    /// Native single-step forecast at the start of the test range.
    pub native_first: f64,
}

/// Fit `order` on train + validation and forecast the test range one step at a time.
pub fn run_forecast(
    series: &Series,
    config: &PipelineConfig,
    order: SarimaOrder,
) -> Result<ForecastRun> {
    let parts = prepare_split(series, config)?;
    let history = parts.train_plus_validation()?;
    let model = fit_final(&history, order, &config.fit_options())?;
    let forecast = forecast_one_step(series, &model, parts.test(), &config.model_label)?;
    let native_first = cross_check(&model, &forecast)?;
    info!(
        rows = forecast.len(),
        native_first, "one-step forecast matches native forecast"
    );
    Ok(ForecastRun {
        model,
        forecast,
        native_first,
    })
}
