//! Property-based tests for splitting, ranking and candidate enumeration.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated series lengths, fractions and scores.

use chrono::{Duration, TimeZone, Utc};
use imbalance_forecast::core::Series;
use imbalance_forecast::models::arima::{apply_difference, integrate_next, integration_weights, CandidateOrder};
use imbalance_forecast::search::{CandidateOutcome, OrderGrid, SearchResult, SearchTable};
use imbalance_forecast::split::{split, split_at, split_slice, SplitFractions};
use proptest::prelude::*;

/// Create a half-hourly series of length `n`.
fn make_series(n: usize) -> Series {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let values = (0..n).map(|i| (i as f64 * 0.37).sin() * 10.0).collect();
    Series::regular(base, Duration::minutes(30), values, 48).unwrap()
}

/// Strategy for ordered fractions `0 <= train <= valid <= 1`.
fn fractions_strategy() -> impl Strategy<Value = SplitFractions> {
    (0.0..=1.0_f64, 0.0..=1.0_f64).prop_map(|(a, b)| SplitFractions {
        train: a.min(b),
        valid_cumulative: a.max(b),
    })
}

/// Strategy for one search row: a score or a failure.
fn outcome_strategy() -> impl Strategy<Value = CandidateOutcome> {
    prop_oneof![
        3 => (0.0..100.0_f64, 0.0..100.0_f64).prop_map(|(mae, rmse)| CandidateOutcome::Scored { mae, rmse }),
        1 => Just(CandidateOutcome::Failed("did not converge".to_string())),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Partitions are contiguous, disjoint and cover the whole series.
    #[test]
    fn split_partitions_cover_series(n in 1usize..600, fractions in fractions_strategy()) {
        let series = make_series(n);
        let parts = split(&series, fractions).unwrap();
        let (train, valid, test) = parts.sizes();

        prop_assert_eq!(train + valid + test, n);
        prop_assert_eq!(train, (fractions.train * n as f64).floor() as usize);
        prop_assert_eq!(train + valid, (fractions.valid_cumulative * n as f64).floor() as usize);

        let joined = parts.train_plus_validation().unwrap().join(parts.test()).unwrap();
        prop_assert_eq!(joined, series);
    }

    /// Index-based and time-based splits assign every timestamp identically.
    #[test]
    fn split_views_agree(n in 1usize..600, fractions in fractions_strategy()) {
        let series = make_series(n);
        let by_index = split(&series, fractions).unwrap();
        let by_time = split_at(&series, by_index.boundaries()).unwrap();
        let (train, valid, test) = split_slice(series.values(), fractions).unwrap();

        prop_assert_eq!(by_index.train(), by_time.train());
        prop_assert_eq!(by_index.validation(), by_time.validation());
        prop_assert_eq!(by_index.test(), by_time.test());
        prop_assert_eq!(train, by_index.train().values());
        prop_assert_eq!(valid, by_index.validation().values());
        prop_assert_eq!(test, by_index.test().values());
    }

    /// Scored rows come first in (RMSE, MAE) order, failures last.
    #[test]
    fn table_is_ranked(outcomes in prop::collection::vec(outcome_strategy(), 1..40)) {
        let rows: Vec<SearchResult> = outcomes
            .into_iter()
            .enumerate()
            .map(|(i, outcome)| SearchResult::new(i, CandidateOrder::new((i % 3, 1, 0), (0, 1, 1), 48), outcome))
            .collect();
        let total = rows.len();
        let table = SearchTable::from_results(rows);

        prop_assert_eq!(table.len(), total);
        let scored = total - table.failures();
        prop_assert!(table.rows()[..scored].iter().all(|r| r.outcome.is_scored()));
        prop_assert!(table.rows()[scored..].iter().all(|r| !r.outcome.is_scored()));

        for pair in table.rows()[..scored].windows(2) {
            let (a, b) = (&pair[0].outcome, &pair[1].outcome);
            let key_a = (a.rmse().unwrap(), a.mae().unwrap());
            let key_b = (b.rmse().unwrap(), b.mae().unwrap());
            prop_assert!(key_a <= key_b);
        }
    }

    /// The candidate set is the full cartesian product of the grid.
    #[test]
    fn grid_is_exhaustive(
        p in prop::collection::btree_set(0usize..4, 1..3),
        q in prop::collection::btree_set(0usize..4, 1..3),
        sq in prop::collection::btree_set(0usize..3, 1..3),
    ) {
        let grid = OrderGrid {
            p: p.iter().copied().collect(),
            d: vec![1],
            q: q.iter().copied().collect(),
            seasonal_p: vec![0],
            seasonal_d: vec![1],
            seasonal_q: sq.iter().copied().collect(),
        };
        let candidates = grid.candidates(48);
        prop_assert_eq!(candidates.len(), p.len() * q.len() * sq.len());

        let unique: std::collections::HashSet<_> = candidates.iter().collect();
        prop_assert_eq!(unique.len(), candidates.len());
        prop_assert!(candidates.iter().all(|c| p.contains(&c.p) && q.contains(&c.q) && sq.contains(&c.cap_q)));
    }

    /// Integrating the differenced series reproduces the original values.
    #[test]
    fn differencing_inverts(
        values in prop::collection::vec(-1000.0..1000.0_f64, 20..80),
        d in 0usize..2,
        seasonal_d in 0usize..2,
        period in 2usize..6,
    ) {
        let delta = integration_weights(d, seasonal_d, period);
        let w = apply_difference(&values, &delta);
        let k = delta.len();
        prop_assert_eq!(w.len(), values.len() - k);
        for (i, wi) in w.iter().enumerate() {
            let restored = integrate_next(&values[..i + k], &delta, *wi);
            prop_assert!((restored - values[i + k]).abs() <= 1e-9 * (1.0 + values[i + k].abs()));
        }
    }
}
