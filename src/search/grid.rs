//! Cartesian grid of candidate SARIMA orders.

use crate::error::{ForecastError, Result};
use crate::models::arima::CandidateOrder;
use serde::{Deserialize, Serialize};

/// Per-parameter value lists whose cartesian product forms the candidate set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderGrid {
    pub p: Vec<usize>,
    pub d: Vec<usize>,
    pub q: Vec<usize>,
    #[serde(rename = "P")]
    pub seasonal_p: Vec<usize>,
    #[serde(rename = "D")]
    pub seasonal_d: Vec<usize>,
    #[serde(rename = "Q")]
    pub seasonal_q: Vec<usize>,
}

impl Default for OrderGrid {
    fn default() -> Self {
        Self {
            p: vec![0, 1, 2],
            d: vec![1],
            q: vec![0, 1, 2],
            seasonal_p: vec![0, 1, 2],
            seasonal_d: vec![1],
            seasonal_q: vec![0, 1, 2],
        }
    }
}

impl OrderGrid {
    /// A grid containing exactly one candidate.
    pub fn single(order: CandidateOrder) -> Self {
        Self {
            p: vec![order.p],
            d: vec![order.d],
            q: vec![order.q],
            seasonal_p: vec![order.cap_p],
            seasonal_d: vec![order.cap_d],
            seasonal_q: vec![order.cap_q],
        }
    }

    fn dimensions(&self) -> [(&'static str, &[usize]); 6] {
        [
            ("p", self.p.as_slice()),
            ("d", self.d.as_slice()),
            ("q", self.q.as_slice()),
            ("P", self.seasonal_p.as_slice()),
            ("D", self.seasonal_d.as_slice()),
            ("Q", self.seasonal_q.as_slice()),
        ]
    }

    /// Number of candidates in the grid.
    pub fn len(&self) -> usize {
        self.dimensions().iter().map(|(_, v)| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every dimension needs at least one value.
    pub fn validate(&self) -> Result<()> {
        for (name, values) in self.dimensions() {
            if values.is_empty() {
                return Err(ForecastError::InvalidParameter(format!(
                    "grid dimension '{}' has no values",
                    name
                )));
            }
        }
        Ok(())
    }

    /// All candidates, `p` varying slowest and `Q` fastest.
    ///
    /// Orders are not validated here; invalid combinations are left for the
    /// search to record as failures.
    pub fn candidates(&self, period: usize) -> Vec<CandidateOrder> {
        let mut out = Vec::with_capacity(self.len());
        for &p in &self.p {
            for &d in &self.d {
                for &q in &self.q {
                    for &sp in &self.seasonal_p {
                        for &sd in &self.seasonal_d {
                            for &sq in &self.seasonal_q {
                                out.push(CandidateOrder::new((p, d, q), (sp, sd, sq), period));
                            }
                        }
                    }
                }
            }
        }
        out
    }
}
