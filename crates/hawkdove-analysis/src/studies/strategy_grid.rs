//! Final strategies of every agent, placed by rank and `f`.

use std::collections::BTreeSet;

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry, Regime};
use serde::Serialize;

use super::final_values;
use crate::dataset::{ComparisonDataset, Series};
use crate::error::{AnalysisError, Result};
use crate::layout::RunLocator;
use crate::reshape::reshape_row;

/// Final strategy of one agent at one `f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingPoint {
    /// Final rank (outscore) of the agent.
    pub rank: f64,
    /// Power asymmetry of the run.
    pub power: PowerAsymmetry,
    /// Visitor-role hawk weight.
    pub visit_hawk: f64,
    /// Host-role hawk weight.
    pub host_hawk: f64,
    /// Visitor-role fox weight.
    pub fox: f64,
}

/// Every agent's final strategy across a regime's sweep.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyGrid {
    /// The regime shown.
    pub regime: Regime,
    /// One point per agent and `f`, sweep order then agent order.
    pub points: Vec<RingPoint>,
}

impl StrategyGrid {
    /// Regroup as one condition per `f`, with the visitor hawk, host hawk
    /// and fox weights each as a series over rank.
    pub fn to_dataset(&self) -> ComparisonDataset {
        let mut dataset = ComparisonDataset::new(self.regime.dir_name());
        let powers: BTreeSet<PowerAsymmetry> = self.points.iter().map(|p| p.power).collect();
        for power in powers {
            let at: Vec<&RingPoint> = self.points.iter().filter(|p| p.power == power).collect();
            let condition = ConditionKey::for_regime(self.regime, power);
            let series = |label: &str, pick: fn(&RingPoint) -> f64| {
                Series::new(label, at.iter().map(|p| (p.rank, pick(p))).collect())
            };
            dataset.insert(condition, series("Visit hawk", |p| p.visit_hawk));
            dataset.insert(condition, series("Host hawk", |p| p.host_hawk));
            dataset.insert(condition, series("Fox", |p| p.fox));
        }
        dataset
    }
}

/// Collect final strategies for `regime` over `sweep`.
///
/// # Errors
///
/// Fails if a table is missing or malformed, or if the rank and strategy
/// tables of one condition disagree on the number of agents.
pub fn strategy_grid(
    locator: &dyn RunLocator,
    regime: Regime,
    sweep: &[PowerAsymmetry],
) -> Result<StrategyGrid> {
    let mut points = Vec::new();
    for &power in sweep {
        let condition = ConditionKey::for_regime(regime, power);
        let ranks = final_values(locator, &condition, Metric::OutScore, None)?;
        let agents = Some(ranks.len());
        let visit = final_values(locator, &condition, Metric::StrategyVisit, agents)?;
        let host = final_values(locator, &condition, Metric::StrategyHost, agents)?;

        let collect = || -> Result<Vec<RingPoint>> {
            let visit = reshape_row(&visit, Metric::StrategyVisit.stride())?;
            let host = reshape_row(&host, Metric::StrategyHost.stride())?;
            ranks
                .iter()
                .enumerate()
                .map(|(agent, &rank)| {
                    let v = visit.agent(agent);
                    let h = host.agent(agent);
                    match (v, h) {
                        (Some([visit_hawk, _, fox]), Some([host_hawk, _])) => Ok(RingPoint {
                            rank,
                            power,
                            visit_hawk: *visit_hawk,
                            host_hawk: *host_hawk,
                            fox: *fox,
                        }),
                        _ => Err(AnalysisError::shape(
                            "strategy grid",
                            format!("agent {agent} missing from strategy tables"),
                        )),
                    }
                })
                .collect()
        };
        points.extend(collect().map_err(|e| e.in_condition(condition))?);
    }
    Ok(StrategyGrid { regime, points })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use hawkdove_types::{NetworkRegime, RankRegime};

    use super::*;
    use crate::layout::IndexedLayout;
    use crate::studies::fixtures::write_table;

    const REGIME: Regime = Regime::new(RankRegime::Dynamic, NetworkRegime::Static);

    #[test]
    fn collects_one_point_per_agent_and_power() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = [PowerAsymmetry::from_milli(0), PowerAsymmetry::from_milli(500)];
        for f in sweep {
            let key = ConditionKey::for_regime(REGIME, f);
            write_table(dir.path(), &key, Metric::OutScore, &[vec![2.0, 1.0]]);
            write_table(
                dir.path(),
                &key,
                Metric::StrategyVisit,
                &[vec![0.9, 0.05, 0.05, 0.1, 0.3, 0.6]],
            );
            write_table(dir.path(), &key, Metric::StrategyHost, &[vec![0.85, 0.15, 0.2, 0.8]]);
        }

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let grid = strategy_grid(&layout, REGIME, &sweep).unwrap();
        assert_eq!(grid.points.len(), 4);
        let second = grid.points.get(1).unwrap();
        assert_eq!(second.rank, 1.0);
        assert_eq!(second.visit_hawk, 0.1);
        assert_eq!(second.host_hawk, 0.2);
        assert_eq!(second.fox, 0.6);

        let dataset = grid.to_dataset();
        assert_eq!(dataset.len(), 2);
        let fox = dataset
            .get(&ConditionKey::for_regime(REGIME, PowerAsymmetry::from_milli(500)))
            .unwrap()
            .iter()
            .find(|s| s.label == "Fox")
            .unwrap();
        assert_eq!(fox.points, vec![(2.0, 0.05), (1.0, 0.6)]);
    }

    #[test]
    fn dataset_groups_each_power_once() {
        let point = |milli, rank| RingPoint {
            rank,
            power: PowerAsymmetry::from_milli(milli),
            visit_hawk: 0.5,
            host_hawk: 0.5,
            fox: 0.0,
        };
        let grid = StrategyGrid {
            regime: REGIME,
            points: vec![point(0, 1.0), point(500, 1.0), point(0, 2.0)],
        };

        let dataset = grid.to_dataset();
        assert_eq!(dataset.len(), 2);
        let at_zero = dataset
            .get(&ConditionKey::for_regime(REGIME, PowerAsymmetry::from_milli(0)))
            .unwrap();
        assert_eq!(at_zero.len(), 3);
        assert_eq!(at_zero.first().unwrap().points, vec![(1.0, 0.5), (2.0, 0.5)]);
    }

    #[test]
    fn host_table_with_wrong_width_fails() {
        let dir = tempfile::tempdir().unwrap();
        let f = PowerAsymmetry::from_milli(0);
        let key = ConditionKey::for_regime(REGIME, f);
        write_table(dir.path(), &key, Metric::OutScore, &[vec![2.0, 1.0]]);
        write_table(dir.path(), &key, Metric::StrategyVisit, &[vec![0.0; 6]]);
        write_table(dir.path(), &key, Metric::StrategyHost, &[vec![0.0; 6]]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let err = strategy_grid(&layout, REGIME, &[f]).unwrap_err();
        assert!(err.to_string().contains("StrategyHost"), "{err}");
    }
}
