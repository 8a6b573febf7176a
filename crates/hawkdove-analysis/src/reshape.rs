//! Fixed-stride extraction from run tables.
//!
//! Column `agent * stride + offset` of a table holds component `offset` of
//! agent `agent`. Every accessor here checks that arithmetic against the
//! table's width and fails with [`AnalysisError::ShapeMismatch`] instead of
//! reading a neighbouring agent's column.
//!
//! Two access patterns occur:
//!
//! - full history of one agent ([`agent_series`], [`component_history`]);
//! - final-state snapshot across agents ([`final_row`], [`reshape_row`],
//!   [`component`]).

use hawkdove_types::Metric;
use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::table::RunTable;

/// One scalar attribute of one agent over time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentSeries {
    /// Metric the values came from.
    pub metric: Metric,
    /// Agent index.
    pub agent: usize,
    /// Component offset within the agent's block.
    pub offset: usize,
    /// One value per table row.
    pub values: Vec<f64>,
}

/// One row reshaped into `agents x stride`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeMatrix {
    stride: usize,
    values: Vec<f64>,
}

impl AttributeMatrix {
    /// `(agents, stride)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.agents(), self.stride)
    }

    /// Number of agents (rows).
    pub fn agents(&self) -> usize {
        self.values.len().checked_div(self.stride).unwrap_or(0)
    }

    /// Components per agent (columns).
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// All components of one agent.
    pub fn agent(&self, agent: usize) -> Option<&[f64]> {
        let start = agent.checked_mul(self.stride)?;
        let end = start.checked_add(self.stride)?;
        self.values.get(start..end)
    }

    /// One component across all agents.
    pub fn component(&self, offset: usize) -> Option<Vec<f64>> {
        if offset >= self.stride {
            return None;
        }
        Some(
            self.values
                .iter()
                .skip(offset)
                .step_by(self.stride)
                .copied()
                .collect(),
        )
    }
}

/// Reshape a flat row into an `agents x stride` matrix.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] if `stride` is zero or does not divide
/// the row length.
pub fn reshape_row(row: &[f64], stride: usize) -> Result<AttributeMatrix> {
    if stride == 0 {
        return Err(AnalysisError::shape("reshape", "stride must be at least 1"));
    }
    if row.len() % stride != 0 {
        return Err(AnalysisError::shape(
            "reshape",
            format!("row of length {} is not divisible by stride {stride}", row.len()),
        ));
    }
    Ok(AttributeMatrix {
        stride,
        values: row.to_vec(),
    })
}

/// The final row of a table (cross-sectional final state).
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if the table has no rows.
pub fn final_row(table: &RunTable) -> Result<&[f64]> {
    table
        .last_row()
        .ok_or_else(|| AnalysisError::empty(format!("{} has no rows", table.path().display())))
}

/// One row by index.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] if `index` is past the last row.
pub fn row(table: &RunTable, index: usize) -> Result<&[f64]> {
    table.row(index).ok_or_else(|| {
        AnalysisError::shape(
            table.path().display().to_string(),
            format!("row {index} requested from {} rows", table.rows()),
        )
    })
}

/// Column index of `(agent, offset)` under `metric`'s stride, validated
/// against a row of `width` columns.
fn column_index(metric: Metric, agent: usize, offset: usize, width: usize) -> Result<usize> {
    let stride = metric.stride();
    if !metric.per_agent() {
        return Err(AnalysisError::shape(
            metric.to_string(),
            "table is not split by agent",
        ));
    }
    if offset >= stride {
        return Err(AnalysisError::shape(
            metric.to_string(),
            format!("component offset {offset} outside stride {stride}"),
        ));
    }
    if width % stride != 0 {
        return Err(AnalysisError::shape(
            metric.to_string(),
            format!("{width} columns is not a multiple of stride {stride}"),
        ));
    }
    agent
        .checked_mul(stride)
        .and_then(|base| base.checked_add(offset))
        .filter(|column| *column < width)
        .ok_or_else(|| {
            AnalysisError::shape(
                metric.to_string(),
                format!(
                    "agent {agent} out of range for {} agents",
                    width / stride
                ),
            )
        })
}

/// Full time series of one component of one agent.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] on a stride mismatch, an offset outside
/// the stride, or an agent index past the last agent.
pub fn agent_series(
    table: &RunTable,
    metric: Metric,
    agent: usize,
    offset: usize,
) -> Result<AgentSeries> {
    let column = column_index(metric, agent, offset, table.columns())?;
    let values = table.column(column).ok_or_else(|| {
        AnalysisError::shape(metric.to_string(), format!("column {column} missing"))
    })?;
    Ok(AgentSeries {
        metric,
        agent,
        offset,
        values,
    })
}

/// One component across all agents of a single row (e.g. the fox weight
/// `2::3` of every visitor strategy).
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] on a stride mismatch or an offset
/// outside the stride.
pub fn component(row: &[f64], metric: Metric, offset: usize) -> Result<Vec<f64>> {
    let matrix = reshape_row(row, metric.stride())?;
    matrix.component(offset).ok_or_else(|| {
        AnalysisError::shape(
            metric.to_string(),
            format!(
                "component offset {offset} outside stride {}",
                metric.stride()
            ),
        )
    })
}

/// One component of every agent over the whole run, as `agents x time`.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] on a stride mismatch or an offset
/// outside the stride.
pub fn component_history(table: &RunTable, metric: Metric, offset: usize) -> Result<Vec<Vec<f64>>> {
    let agents = table.agent_count(metric, None)?;
    let mut history: Vec<Vec<f64>> = vec![Vec::with_capacity(table.rows()); agents];
    for row in table.iter_rows() {
        let values = component(row, metric, offset)?;
        for (series, value) in history.iter_mut().zip(values) {
            series.push(value);
        }
    }
    Ok(history)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn table(rows: &[Vec<f64>]) -> RunTable {
        RunTable::from_rows("test.csv", rows).unwrap()
    }

    #[test]
    fn reshape_sixty_by_three() {
        let row: Vec<f64> = (0..60).map(f64::from).collect();
        let matrix = reshape_row(&row, 3).unwrap();
        assert_eq!(matrix.shape(), (20, 3));
        assert_eq!(matrix.agent(1).unwrap(), &[3.0, 4.0, 5.0]);
        assert_eq!(matrix.component(2).unwrap().len(), 20);
    }

    #[test]
    fn reshape_sixty_one_by_three_fails() {
        let row: Vec<f64> = (0..61).map(f64::from).collect();
        let err = reshape_row(&row, 3).unwrap_err();
        assert!(matches!(err, AnalysisError::ShapeMismatch { .. }));
        assert!(reshape_row(&row, 0).is_err());
    }

    #[test]
    fn extracts_single_agent_column() {
        let t = table(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]);
        let series = agent_series(&t, Metric::OutScore, 1, 0).unwrap();
        assert_eq!(series.values, vec![2.0, 4.0, 6.0]);
        assert_eq!(series.agent, 1);
    }

    #[test]
    fn agent_series_respects_stride() {
        // Two agents of StrategyVisit: (hawk, dove, fox) each.
        let t = table(&[
            vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            vec![0.7, 0.8, 0.9, 1.0, 0.0, 0.25],
        ]);
        let fox = agent_series(&t, Metric::StrategyVisit, 1, 2).unwrap();
        assert_eq!(fox.values, vec![0.6, 0.25]);
        assert!(agent_series(&t, Metric::StrategyVisit, 2, 0).is_err());
        assert!(agent_series(&t, Metric::StrategyVisit, 0, 3).is_err());
        assert!(agent_series(&t, Metric::StrategyHost, 0, 0).is_ok());
        assert!(agent_series(&t, Metric::EvoStats, 0, 0).is_err());
    }

    #[test]
    fn agent_series_rejects_width_not_matching_stride() {
        let t = table(&[vec![0.1, 0.2, 0.3, 0.4]]);
        let err = agent_series(&t, Metric::StrategyVisit, 0, 0).unwrap_err();
        assert!(err.to_string().contains("not a multiple of stride 3"), "{err}");
    }

    #[test]
    fn final_row_is_last() {
        let t = table(&[vec![1.0], vec![2.0]]);
        assert_eq!(final_row(&t).unwrap(), &[2.0]);
        assert_eq!(row(&t, 0).unwrap(), &[1.0]);
        assert!(row(&t, 2).is_err());
    }

    #[test]
    fn fox_component_of_final_row() {
        let last = [0.9, 0.1, 0.0, 0.2, 0.5, 0.3];
        assert_eq!(
            component(&last, Metric::StrategyVisit, 2).unwrap(),
            vec![0.0, 0.3]
        );
        assert_eq!(
            component(&last, Metric::StrategyHost, 0).unwrap(),
            vec![0.9, 0.0, 0.5]
        );
        assert!(component(&last, Metric::StrategyHost, 2).is_err());
    }

    #[test]
    fn history_is_agents_by_time() {
        let t = table(&[
            vec![0.9, 0.1, 0.2, 0.4],
            vec![0.8, 0.2, 0.3, 0.7],
            vec![0.7, 0.3, 0.4, 0.6],
        ]);
        let history = component_history(&t, Metric::StrategyHost, 0).unwrap();
        assert_eq!(history, vec![vec![0.9, 0.8, 0.7], vec![0.2, 0.3, 0.4]]);
    }
}
