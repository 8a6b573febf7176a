//! Min-max normalisation.
//!
//! A constant series has no range to divide by. Rather than letting that
//! produce NaN, callers choose a [`DegeneratePolicy`].

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// What [`minmax_normalize`] does with a constant series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegeneratePolicy {
    /// Fail with [`AnalysisError::DegenerateRange`].
    #[default]
    Reject,
    /// Map every value to `0.0`.
    Zero,
}

/// A series rescaled into `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedSeries(Vec<f64>);

impl NormalizedSeries {
    /// The rescaled values.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// Take ownership of the values.
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series is empty. Never true for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rescale `series` with `(x - min) / (max - min)`.
///
/// # Errors
///
/// - [`AnalysisError::EmptyInput`] for an empty series.
/// - [`AnalysisError::NonFinite`] if any value is NaN or infinite.
/// - [`AnalysisError::DegenerateRange`] for a constant series under
///   [`DegeneratePolicy::Reject`].
pub fn minmax_normalize(series: &[f64], policy: DegeneratePolicy) -> Result<NormalizedSeries> {
    if series.is_empty() {
        return Err(AnalysisError::empty("min-max normalisation of an empty series"));
    }
    if let Some(index) = series.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFinite {
            context: "min-max normalisation".to_owned(),
            index,
        });
    }

    let (min, max) = series
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if max > min {
        let range = max - min;
        let values = if range.is_finite() {
            series.iter().map(|v| (v - min) / range).collect()
        } else {
            // Extremes too far apart to subtract; halving keeps every
            // difference finite.
            let (half_min, half_range) = (min / 2.0, max / 2.0 - min / 2.0);
            series
                .iter()
                .map(|v| ((v / 2.0 - half_min) / half_range).clamp(0.0, 1.0))
                .collect()
        };
        return Ok(NormalizedSeries(values));
    }

    match policy {
        DegeneratePolicy::Reject => Err(AnalysisError::DegenerateRange {
            context: "min-max normalisation".to_owned(),
            value: min,
        }),
        DegeneratePolicy::Zero => Ok(NormalizedSeries(vec![0.0; series.len()])),
    }
}

/// Clip every value into `[0, 1]`. NaN passes through unchanged.
pub fn clamp_unit(series: &[f64]) -> Vec<f64> {
    series.iter().map(|v| v.clamp(0.0, 1.0)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    #[test]
    fn normalises_to_unit_interval() {
        let n = minmax_normalize(&[2.0, 4.0, 6.0], DegeneratePolicy::Reject).unwrap();
        assert_eq!(n.values(), &[0.0, 0.5, 1.0]);
    }

    #[test]
    fn constant_series_is_rejected_by_default() {
        let err = minmax_normalize(&[3.0, 3.0, 3.0], DegeneratePolicy::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateRange { value, .. } if value == 3.0));
    }

    #[test]
    fn constant_series_zeroes_under_zero_policy() {
        let n = minmax_normalize(&[3.0, 3.0], DegeneratePolicy::Zero).unwrap();
        assert_eq!(n.into_inner(), vec![0.0, 0.0]);
    }

    #[test]
    fn single_value_is_degenerate() {
        assert!(minmax_normalize(&[1.5], DegeneratePolicy::Reject).is_err());
    }

    #[test]
    fn empty_and_non_finite_inputs_fail() {
        assert!(matches!(
            minmax_normalize(&[], DegeneratePolicy::Zero),
            Err(AnalysisError::EmptyInput { .. })
        ));
        assert!(matches!(
            minmax_normalize(&[1.0, f64::NAN, 2.0], DegeneratePolicy::Zero),
            Err(AnalysisError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn random_series_span_zero_to_one() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let len = rng.random_range(2..50);
            let series: Vec<f64> = (0..len).map(|_| rng.random_range(-1e3..1e3)).collect();
            let n = minmax_normalize(&series, DegeneratePolicy::Reject).unwrap();
            assert_eq!(n.len(), series.len());
            let min = n.values().iter().copied().fold(f64::INFINITY, f64::min);
            let max = n.values().iter().copied().fold(f64::NEG_INFINITY, f64::max);
            assert!(min.abs() < 1e-12);
            assert!((max - 1.0).abs() < 1e-12);
            assert!(n.values().iter().all(|v| (0.0..=1.0).contains(v)));
            for _ in 0..20 {
                let i = rng.random_range(0..len);
                let j = rng.random_range(0..len);
                if series[i] < series[j] {
                    assert!(n.values()[i] <= n.values()[j], "{series:?}");
                }
            }
        }
    }

    #[test]
    fn extreme_range_stays_in_unit_interval() {
        let n = minmax_normalize(&[-1e308, 0.0, 1e308], DegeneratePolicy::Reject).unwrap();
        assert_eq!(n.values(), &[0.0, 0.5, 1.0]);

        let wide = [f64::MAX, -f64::MAX, 1.0, -3e307, 2e307];
        let n = minmax_normalize(&wide, DegeneratePolicy::Reject).unwrap();
        assert!(n.values().iter().all(|v| (0.0..=1.0).contains(v)), "{n:?}");
        assert_eq!((n.values()[0], n.values()[1]), (1.0, 0.0));
        for (a, b) in wide.iter().zip(n.values()) {
            for (c, d) in wide.iter().zip(n.values()) {
                if a < c {
                    assert!(b <= d);
                }
            }
        }
    }

    #[test]
    fn clamp_clips_out_of_range_weights() {
        assert_eq!(clamp_unit(&[-0.2, 0.5, 1.3]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn policy_deserialises_snake_case() {
        let policy: DegeneratePolicy = serde_json::from_str("\"zero\"").unwrap();
        assert_eq!(policy, DegeneratePolicy::Zero);
    }
}
