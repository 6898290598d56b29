//! Seasonal ARIMA order `(p, d, q)(P, D, Q)[s]`.

use crate::error::{ForecastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest combined differencing order accepted by the estimator.
pub const MAX_TOTAL_DIFFERENCING: usize = 2;

/// Full SARIMA order (p, d, q, P, D, Q, s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SarimaOrder {
    /// Non-seasonal AR order.
    pub p: usize,
    /// Non-seasonal differencing order.
    pub d: usize,
    /// Non-seasonal MA order.
    pub q: usize,
    /// Seasonal AR order.
    pub cap_p: usize,
    /// Seasonal differencing order.
    pub cap_d: usize,
    /// Seasonal MA order.
    pub cap_q: usize,
    /// Seasonal period.
    pub period: usize,
}

/// One point of the hyperparameter grid.
pub type CandidateOrder = SarimaOrder;

impl SarimaOrder {
    pub fn new(order: (usize, usize, usize), seasonal: (usize, usize, usize), period: usize) -> Self {
        Self {
            p: order.0,
            d: order.1,
            q: order.2,
            cap_p: seasonal.0,
            cap_d: seasonal.1,
            cap_q: seasonal.2,
            period,
        }
    }

    /// Non-seasonal ARIMA(p, d, q).
    pub fn non_seasonal(p: usize, d: usize, q: usize) -> Self {
        Self::new((p, d, q), (0, 0, 0), 0)
    }

    /// `(p, d, q)` part.
    pub fn order(&self) -> (usize, usize, usize) {
        (self.p, self.d, self.q)
    }

    /// `(P, D, Q)` part.
    pub fn seasonal_order(&self) -> (usize, usize, usize) {
        (self.cap_p, self.cap_d, self.cap_q)
    }

    /// Check if this is a seasonal model.
    pub fn is_seasonal(&self) -> bool {
        self.period > 1 && (self.cap_p > 0 || self.cap_d > 0 || self.cap_q > 0)
    }

    /// Effective seasonal lag (0 when the model has no seasonal part).
    pub fn seasonal_lag(&self) -> usize {
        if self.is_seasonal() {
            self.period
        } else {
            0
        }
    }

    /// Number of observations consumed by differencing.
    pub fn differencing_lag(&self) -> usize {
        self.d + self.seasonal_lag() * self.cap_d
    }

    /// Degree of the expanded AR polynomial.
    pub fn ar_lag(&self) -> usize {
        self.p + self.seasonal_lag() * self.cap_p
    }

    /// Degree of the expanded MA polynomial.
    pub fn ma_lag(&self) -> usize {
        self.q + self.seasonal_lag() * self.cap_q
    }

    /// A mean term is only estimated for undifferenced models.
    pub fn includes_mean(&self) -> bool {
        self.d + self.cap_d == 0
    }

    /// Number of estimated coefficients (ARMA terms plus optional mean).
    pub fn num_params(&self) -> usize {
        self.p + self.q + self.cap_p + self.cap_q + usize::from(self.includes_mean())
    }

    /// Reject orders the estimator cannot handle.
    pub fn validate(&self) -> Result<()> {
        if self.d + self.cap_d > MAX_TOTAL_DIFFERENCING {
            return Err(ForecastError::InvalidParameter(format!(
                "total differencing d + D = {} exceeds {}",
                self.d + self.cap_d,
                MAX_TOTAL_DIFFERENCING
            )));
        }
        let has_seasonal_terms = self.cap_p > 0 || self.cap_d > 0 || self.cap_q > 0;
        if has_seasonal_terms && self.period < 2 {
            return Err(ForecastError::InvalidParameter(format!(
                "seasonal terms require a period >= 2, got {}",
                self.period
            )));
        }
        Ok(())
    }
}

impl fmt::Display for SarimaOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.p, self.d, self.q)?;
        if self.is_seasonal() {
            write!(
                f,
                "({},{},{})[{}]",
                self.cap_p, self.cap_d, self.cap_q, self.period
            )?;
        }
        Ok(())
    }
}

/// Parse a `p,d,q` triple.
pub fn parse_triple(text: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<&str> = text.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ForecastError::InvalidParameter(format!(
            "expected three comma-separated orders, got '{}'",
            text
        )));
    }
    let mut out = [0usize; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = usize::from_str(part).map_err(|_| {
            ForecastError::InvalidParameter(format!("order '{}' is not a non-negative integer", part))
        })?;
    }
    Ok((out[0], out[1], out[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lags_and_params() {
        let order = SarimaOrder::new((2, 1, 1), (1, 1, 1), 48);
        assert!(order.is_seasonal());
        assert_eq!(order.differencing_lag(), 49);
        assert_eq!(order.ar_lag(), 50);
        assert_eq!(order.ma_lag(), 49);
        assert!(!order.includes_mean());
        assert_eq!(order.num_params(), 5);

        let plain = SarimaOrder::non_seasonal(1, 0, 1);
        assert!(plain.includes_mean());
        assert_eq!(plain.num_params(), 3);
        assert_eq!(plain.ar_lag(), 1);
    }

    #[test]
    fn seasonal_terms_ignored_without_period() {
        let order = SarimaOrder::new((1, 1, 0), (0, 0, 0), 48);
        assert!(!order.is_seasonal());
        assert_eq!(order.differencing_lag(), 1);
        assert_eq!(order.to_string(), "(1,1,0)");
    }

    #[test]
    fn validate_rejects_excess_differencing() {
        let order = SarimaOrder::new((0, 2, 0), (0, 1, 0), 12);
        assert!(matches!(
            order.validate(),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(SarimaOrder::new((1, 1, 1), (0, 1, 1), 12).validate().is_ok());
        assert!(SarimaOrder::new((1, 0, 0), (1, 0, 0), 1).validate().is_err());
    }

    #[test]
    fn display_includes_seasonal_part() {
        let order = SarimaOrder::new((2, 1, 1), (0, 1, 1), 48);
        assert_eq!(order.to_string(), "(2,1,1)(0,1,1)[48]");
    }

    #[test]
    fn parse_triple_accepts_spaces() {
        assert_eq!(parse_triple("2, 1,1").unwrap(), (2, 1, 1));
        assert!(parse_triple("2,1").is_err());
        assert!(parse_triple("2,-1,1").is_err());
    }
}
