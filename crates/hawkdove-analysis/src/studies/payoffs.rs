//! Distribution and total of final payoffs per regime.

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry, Regime};
use tracing::debug;

use super::final_values;
use crate::aggregate::lorenz_curve;
use crate::dataset::{ComparisonDataset, Series};
use crate::error::Result;
use crate::layout::RunLocator;

/// Inputs shared by the payoff studies.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoffParams {
    /// Regimes compared, in drawing order.
    pub regimes: Vec<Regime>,
    /// The `f` every regime is read at.
    pub power: PowerAsymmetry,
    /// Expected agent count, validated on load when set.
    pub agents: Option<usize>,
}

/// Lorenz curve of final total payoffs, one series per regime.
///
/// # Errors
///
/// Fails on a missing or malformed table, or when a regime's payoffs sum to
/// zero.
pub fn lorenz_curves(locator: &dyn RunLocator, params: &PayoffParams) -> Result<ComparisonDataset> {
    let mut dataset = ComparisonDataset::new("Lorenz Curve");
    for &regime in &params.regimes {
        let condition = ConditionKey::for_regime(regime, params.power);
        let payoffs = final_values(locator, &condition, Metric::TotalPayoff, params.agents)?;
        let curve = lorenz_curve(&payoffs).map_err(|e| e.in_condition(condition))?;
        dataset.insert(condition, Series::new(regime.label(), curve));
    }
    Ok(dataset)
}

/// Sum of final total payoffs, one single-point series per regime with the
/// regime's position on `x`.
///
/// # Errors
///
/// Fails on a missing or malformed table.
#[allow(clippy::cast_precision_loss)]
pub fn total_payoffs(locator: &dyn RunLocator, params: &PayoffParams) -> Result<ComparisonDataset> {
    let mut dataset = ComparisonDataset::new("Total Payoffs");
    for (position, &regime) in params.regimes.iter().enumerate() {
        let condition = ConditionKey::for_regime(regime, params.power);
        let payoffs = final_values(locator, &condition, Metric::TotalPayoff, params.agents)?;
        let total: f64 = payoffs.iter().sum();
        debug!(%condition, total, "total payoff");
        dataset.insert(
            condition,
            Series::new(regime.label(), vec![(position as f64, total)]),
        );
    }
    Ok(dataset)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use hawkdove_types::{NetworkRegime, RankRegime};

    use super::*;
    use crate::error::AnalysisError;
    use crate::layout::IndexedLayout;
    use crate::studies::fixtures::write_table;

    fn params(regimes: Vec<Regime>) -> PayoffParams {
        PayoffParams {
            regimes,
            power: PowerAsymmetry::from_milli(600),
            agents: Some(4),
        }
    }

    #[test]
    fn lorenz_and_totals_per_regime() {
        let dir = tempfile::tempdir().unwrap();
        let equal = Regime::new(RankRegime::Static, NetworkRegime::Static);
        let skewed = Regime::new(RankRegime::Dynamic, NetworkRegime::Dynamic);
        let f = PowerAsymmetry::from_milli(600);
        write_table(
            dir.path(),
            &ConditionKey::for_regime(equal, f),
            Metric::TotalPayoff,
            &[vec![0.0; 4], vec![5.0; 4]],
        );
        write_table(
            dir.path(),
            &ConditionKey::for_regime(skewed, f),
            Metric::TotalPayoff,
            &[vec![0.0; 4], vec![0.0, 0.0, 0.0, 8.0]],
        );

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let lorenz = lorenz_curves(&layout, &params(vec![equal, skewed])).unwrap();
        let curve = lorenz
            .get(&ConditionKey::for_regime(skewed, f))
            .unwrap()
            .first()
            .unwrap();
        assert_eq!(curve.label, skewed.label());
        assert_eq!(curve.ys(), vec![0.0, 0.0, 0.0, 0.0, 100.0]);

        let totals = total_payoffs(&layout, &params(vec![equal, skewed])).unwrap();
        let ys: Vec<f64> = totals.all_series().flat_map(Series::ys).collect();
        assert_eq!(ys, vec![20.0, 8.0]);
    }

    #[test]
    fn zero_payoffs_are_degenerate() {
        let dir = tempfile::tempdir().unwrap();
        let regime = Regime::new(RankRegime::Static, NetworkRegime::Static);
        let key = ConditionKey::for_regime(regime, PowerAsymmetry::from_milli(600));
        write_table(dir.path(), &key, Metric::TotalPayoff, &[vec![0.0; 4]]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let err = lorenz_curves(&layout, &params(vec![regime])).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Condition { ref source, .. }
                if matches!(**source, AnalysisError::DegenerateRange { .. })
        ));
    }
}
