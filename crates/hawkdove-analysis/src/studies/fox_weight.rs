//! Fox strategy weight by rank.
//!
//! Two views of the same data: the full fox weight history of every agent
//! sorted by final rank (heatmap), and a rank-by-`f` table of final fox
//! weights (LaTeX).

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry, Regime, StrategyComponent};
use serde::Serialize;
use tracing::debug;

use super::{final_component, final_values};
use crate::aggregate::{downsample_columns, rank_order};
use crate::error::{AnalysisError, Result};
use crate::latex::{TableOptions, numeric_rows, to_latex_table};
use crate::layout::RunLocator;
use crate::reshape;

/// Fox weight history of one condition, agents sorted by final rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoxWeightHeatmap {
    /// The condition shown.
    pub condition: ConditionKey,
    /// One row per agent, lowest final rank first, one column per (binned)
    /// time step.
    pub rows: Vec<Vec<f64>>,
    /// Time steps in the run before binning.
    pub time_steps: usize,
}

/// Load and sort the fox weight history of one condition.
///
/// Histories longer than `max_columns` are bin-averaged down to it.
///
/// # Errors
///
/// Fails if either table is missing or malformed, or if the rank table and
/// the strategy table disagree on the number of agents.
pub fn fox_weight_heatmap(
    locator: &dyn RunLocator,
    condition: &ConditionKey,
    max_columns: usize,
) -> Result<FoxWeightHeatmap> {
    let visit = locator.load(condition, Metric::StrategyVisit, None)?;
    let ranks = final_values(locator, condition, Metric::OutScore, None)?;

    let build = || -> Result<FoxWeightHeatmap> {
        let offset = fox_offset()?;
        let history = reshape::component_history(&visit, Metric::StrategyVisit, offset)?;
        if history.len() != ranks.len() {
            return Err(AnalysisError::shape(
                "fox weight heatmap",
                format!("{} strategy agents, {} ranks", history.len(), ranks.len()),
            ));
        }
        let sorted: Vec<Vec<f64>> = rank_order(&ranks)
            .into_iter()
            .filter_map(|agent| history.get(agent).cloned())
            .collect();
        Ok(FoxWeightHeatmap {
            condition: *condition,
            rows: downsample_columns(&sorted, max_columns)?,
            time_steps: visit.rows(),
        })
    };
    let heatmap = build().map_err(|e| e.in_condition(*condition))?;
    debug!(%condition, agents = heatmap.rows.len(), steps = heatmap.time_steps, "fox weight heatmap");
    Ok(heatmap)
}

/// Final fox weight of each rank at each `f` for one regime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoxWeightTable {
    /// The regime tabulated.
    pub regime: Regime,
    /// `(agents + 1) x (sweep + 1)`: row 0 is `[0, f...]`, row `r` is
    /// `[r, weight of rank r at each f...]`.
    pub matrix: Vec<Vec<f64>>,
}

impl FoxWeightTable {
    /// Render as LaTeX.
    ///
    /// # Errors
    ///
    /// Never for a table built by [`fox_weight_table`]; see
    /// [`to_latex_table`].
    pub fn to_latex(&self, options: &TableOptions) -> Result<String> {
        to_latex_table(&numeric_rows(&self.matrix), options)
    }
}

fn fox_offset() -> Result<usize> {
    Metric::StrategyVisit
        .component_offset(StrategyComponent::Fox)
        .ok_or_else(|| AnalysisError::shape("StrategyVisit", "no fox component"))
}

/// Convert a rank value to a 1-based table row.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn rank_row(rank: f64, agents: usize) -> Result<usize> {
    let in_range = rank.is_finite() && rank >= 1.0 && rank <= agents as f64;
    if !in_range || rank.fract().abs() > 0.0 {
        return Err(AnalysisError::shape(
            "fox weight table",
            format!("rank {rank} is not an integer in 1..={agents}"),
        ));
    }
    Ok(rank as usize)
}

/// Tabulate final fox weights by rank across the sweep.
///
/// # Errors
///
/// Fails if a table is missing or malformed, if a rank is not an integer
/// within `1..=agents`, if two agents share a rank, or if the agent count
/// changes across the sweep.
#[allow(clippy::cast_precision_loss)]
pub fn fox_weight_table(
    locator: &dyn RunLocator,
    regime: Regime,
    sweep: &[PowerAsymmetry],
) -> Result<FoxWeightTable> {
    let width = sweep.len().saturating_add(1);
    let mut matrix: Vec<Vec<f64>> = Vec::new();
    let mut header = vec![0.0; width];
    for (cell, f) in header.iter_mut().skip(1).zip(sweep) {
        *cell = f.value();
    }

    for (column, &f) in sweep.iter().enumerate() {
        let condition = ConditionKey::for_regime(regime, f);
        let ranks = final_values(locator, &condition, Metric::OutScore, None)?;
        let fox = final_component(
            locator,
            &condition,
            Metric::StrategyVisit,
            StrategyComponent::Fox,
            Some(ranks.len()),
        )?;

        if matrix.is_empty() {
            matrix = (0..=ranks.len())
                .map(|r| {
                    let mut row = vec![0.0; width];
                    if let Some(label) = row.first_mut() {
                        *label = r as f64;
                    }
                    row
                })
                .collect();
        } else if matrix.len() != ranks.len().saturating_add(1) {
            return Err(AnalysisError::shape(
                "fox weight table",
                format!(
                    "{} agents, earlier conditions had {}",
                    ranks.len(),
                    matrix.len().saturating_sub(1)
                ),
            )
            .in_condition(condition));
        }

        let mut filled = vec![false; ranks.len()];
        for (rank, weight) in ranks.iter().zip(&fox) {
            let row = rank_row(*rank, ranks.len()).map_err(|e| e.in_condition(condition))?;
            match filled.get_mut(row.saturating_sub(1)) {
                Some(seen) if !*seen => *seen = true,
                _ => {
                    return Err(AnalysisError::shape(
                        "fox weight table",
                        format!("duplicate rank {rank}"),
                    )
                    .in_condition(condition));
                }
            }
            if let Some(cell) = matrix
                .get_mut(row)
                .and_then(|r| r.get_mut(column.saturating_add(1)))
            {
                *cell = *weight;
            }
        }
    }

    if let Some(first) = matrix.first_mut() {
        *first = header;
    } else {
        matrix.push(header);
    }
    Ok(FoxWeightTable { regime, matrix })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp, clippy::indexing_slicing)]
mod tests {
    use hawkdove_types::{NetworkRegime, RankRegime};

    use super::*;
    use crate::layout::IndexedLayout;
    use crate::studies::fixtures::write_table;

    const REGIME: Regime = Regime::new(RankRegime::Static, NetworkRegime::Dynamic);

    fn write_condition(root: &std::path::Path, f: PowerAsymmetry, ranks: &[f64], fox: &[f64]) {
        let key = ConditionKey::for_regime(REGIME, f);
        write_table(root, &key, Metric::OutScore, &[vec![0.0; ranks.len()], ranks.to_vec()]);
        let first: Vec<f64> = vec![0.0; fox.len() * 3];
        let last: Vec<f64> = fox.iter().flat_map(|w| [1.0 - w, 0.0, *w]).collect();
        write_table(root, &key, Metric::StrategyVisit, &[first, last]);
    }

    #[test]
    fn heatmap_rows_follow_final_rank() {
        let dir = tempfile::tempdir().unwrap();
        let f = PowerAsymmetry::from_milli(400);
        write_condition(dir.path(), f, &[3.0, 1.0, 2.0], &[0.3, 0.1, 0.2]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let key = ConditionKey::for_regime(REGIME, f);
        let heatmap = fox_weight_heatmap(&layout, &key, 100).unwrap();
        assert_eq!(heatmap.time_steps, 2);
        assert_eq!(
            heatmap.rows,
            vec![vec![0.0, 0.1], vec![0.0, 0.2], vec![0.0, 0.3]]
        );

        let binned = fox_weight_heatmap(&layout, &key, 1).unwrap();
        assert_eq!(binned.rows.first().unwrap(), &vec![0.05]);
    }

    #[test]
    fn table_places_weights_by_rank() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = [PowerAsymmetry::from_milli(0), PowerAsymmetry::from_milli(1000)];
        write_condition(dir.path(), sweep[0], &[2.0, 1.0], &[0.25, 0.75]);
        write_condition(dir.path(), sweep[1], &[1.0, 2.0], &[0.5, 0.0]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let table = fox_weight_table(&layout, REGIME, &sweep).unwrap();
        assert_eq!(
            table.matrix,
            vec![
                vec![0.0, 0.0, 1.0],
                vec![1.0, 0.75, 0.5],
                vec![2.0, 0.25, 0.0],
            ]
        );

        let latex = table.to_latex(&TableOptions::default()).unwrap();
        assert!(latex.contains("1.00 & 0.75 & 0.50 \\\\"), "{latex}");
    }

    #[test]
    fn table_rejects_duplicate_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let f = PowerAsymmetry::from_milli(0);
        write_condition(dir.path(), f, &[1.0, 1.0], &[0.75, 0.25]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let err = fox_weight_table(&layout, REGIME, &[f]).unwrap_err();
        assert!(matches!(err, AnalysisError::Condition { .. }));
        assert!(err.to_string().contains("duplicate rank 1"), "{err}");
    }

    #[test]
    fn table_rejects_fractional_ranks() {
        let dir = tempfile::tempdir().unwrap();
        let f = PowerAsymmetry::from_milli(0);
        write_condition(dir.path(), f, &[1.5, 2.0], &[0.1, 0.2]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let err = fox_weight_table(&layout, REGIME, &[f]).unwrap_err();
        assert!(err.to_string().contains("rank 1.5"), "{err}");
    }

    #[test]
    fn table_rejects_changing_agent_count() {
        let dir = tempfile::tempdir().unwrap();
        let sweep = [PowerAsymmetry::from_milli(0), PowerAsymmetry::from_milli(100)];
        write_condition(dir.path(), sweep[0], &[1.0, 2.0], &[0.1, 0.2]);
        write_condition(dir.path(), sweep[1], &[1.0, 2.0, 3.0], &[0.1, 0.2, 0.3]);

        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let err = fox_weight_table(&layout, REGIME, &sweep).unwrap_err();
        assert!(matches!(err, AnalysisError::Condition { .. }));
    }
}
