//! Pipeline configuration.
//!
//! Every field has a default, so a JSON file only needs to list what it
//! changes:
//!
//! ```json
//! { "period": 48, "grid": { "p": [0, 1], "Q": [1] }, "candidate_timeout_secs": 30 }
//! ```

use crate::error::{ForecastError, Result};
use crate::io::CsvFormat;
use crate::models::arima::{FitOptions, SarimaOrder};
use crate::search::{default_concurrency, OrderGrid, SearchOptions};
use crate::split::SplitFractions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Settings for loading, searching, fitting and writing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    #[serde(flatten)]
    pub format: CsvFormat,
    pub value_column: String,
    /// Observations per seasonal cycle (48 half-hours per day).
    pub period: usize,
    pub train_frac: f64,
    pub valid_frac_cumulative: f64,
    pub grid: OrderGrid,
    /// `(p, d, q)` of the final model.
    pub order: (usize, usize, usize),
    /// `(P, D, Q)` of the final model.
    pub seasonal_order: (usize, usize, usize),
    /// Search workers; all cores but one when unset.
    pub concurrency: Option<usize>,
    pub candidate_timeout_secs: Option<f64>,
    pub max_iter: usize,
    /// Name of the forecast value column.
    pub model_label: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            format: CsvFormat::default(),
            value_column: "Imbalance".to_string(),
            period: 48,
            train_frac: 0.70,
            valid_frac_cumulative: 0.85,
            grid: OrderGrid::default(),
            order: (2, 1, 1),
            seasonal_order: (0, 1, 1),
            concurrency: None,
            candidate_timeout_secs: None,
            max_iter: FitOptions::default().max_iter,
            model_label: "sarima".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Read a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| ForecastError::Config(format!("invalid configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.period == 0 {
            return Err(ForecastError::Config("period must be positive".to_string()));
        }
        if self.concurrency == Some(0) {
            return Err(ForecastError::Config("concurrency must be positive".to_string()));
        }
        if let Some(secs) = self.candidate_timeout_secs {
            if !(secs.is_finite() && secs > 0.0) {
                return Err(ForecastError::Config(format!(
                    "candidate timeout must be a positive number of seconds, got {}",
                    secs
                )));
            }
        }
        if self.model_label.is_empty() {
            return Err(ForecastError::Config("model label must not be empty".to_string()));
        }
        self.format.delimiter_byte()?;
        self.grid
            .validate()
            .map_err(|e| ForecastError::Config(e.to_string()))?;
        self.fractions()
            .map_err(|e| ForecastError::Config(e.to_string()))?;
        Ok(())
    }

    pub fn fractions(&self) -> Result<SplitFractions> {
        SplitFractions::new(self.train_frac, self.valid_frac_cumulative)
    }

    /// Order used by the final fit.
    pub fn final_order(&self) -> SarimaOrder {
        SarimaOrder::new(self.order, self.seasonal_order, self.period)
    }

    pub fn fit_options(&self) -> FitOptions {
        FitOptions {
            max_iter: self.max_iter,
            ..FitOptions::default()
        }
    }

    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            concurrency: self.concurrency.unwrap_or_else(default_concurrency),
            candidate_timeout: self.candidate_timeout_secs.map(Duration::from_secs_f64),
            fit: self.fit_options(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_half_hourly_imbalance() {
        let config = PipelineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.format.timestamp_column, "start_date");
        assert_eq!(config.value_column, "Imbalance");
        assert_eq!(config.period, 48);
        assert_eq!(config.final_order().to_string(), "(2,1,1)(0,1,1)[48]");
        assert_eq!(config.grid.len(), 81);
        assert!(config.search_options().concurrency >= 1);
    }

    #[test]
    fn format_fields_default_when_omitted() {
        let config = PipelineConfig::from_json(r#"{"period": 24}"#).unwrap();
        assert_eq!(config.period, 24);
        assert_eq!(config.format, CsvFormat::default());

        let config = PipelineConfig::from_json(r#"{"delimiter": ";"}"#).unwrap();
        assert_eq!(config.format.delimiter, ';');
        assert_eq!(config.format.timestamp_column, "start_date");
        assert_eq!(config.format.timestamp_format, "%Y-%m-%d %H:%M:%S");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = PipelineConfig::from_json(
            r#"{"period": 24, "timestamp_column": "ts", "grid": {"p": [1]}, "candidate_timeout_secs": 2.5}"#,
        )
        .unwrap();
        assert_eq!(config.period, 24);
        assert_eq!(config.format.timestamp_column, "ts");
        assert_eq!(config.format.delimiter, ',');
        assert_eq!(config.grid.p, vec![1]);
        assert_eq!(config.grid.len(), 27);
        assert_eq!(
            config.search_options().candidate_timeout,
            Some(Duration::from_millis(2500))
        );
        assert_eq!(config.model_label, "sarima");
    }

    #[test]
    fn invalid_values_are_config_errors() {
        for json in [
            r#"{"period": 0}"#,
            r#"{"train_frac": 0.9, "valid_frac_cumulative": 0.8}"#,
            r#"{"grid": {"d": []}}"#,
            r#"{"concurrency": 0}"#,
            r#"{"candidate_timeout_secs": -1}"#,
            r#"{"period": "daily"}"#,
        ] {
            assert!(
                matches!(PipelineConfig::from_json(json), Err(ForecastError::Config(_))),
                "{}",
                json
            );
        }
    }

    #[test]
    fn round_trips_through_json() {
        let config = PipelineConfig {
            order: (1, 1, 0),
            concurrency: Some(3),
            ..Default::default()
        };
        let text = serde_json::to_string(&config).unwrap();
        assert_eq!(PipelineConfig::from_json(&text).unwrap(), config);
    }
}
