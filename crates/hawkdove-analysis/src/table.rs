//! Loader for simulation output tables.
//!
//! A [`RunTable`] is a dense row-major grid of `f64`. Rows are time steps (or
//! runs) and columns follow the metric's flattened agent x component layout.
//! Tables are loaded verbatim and never mutated afterwards; every derived
//! quantity is computed from borrowed rows.
//!
//! Loading is all-or-nothing. A ragged row or a non-numeric cell anywhere in
//! the file fails the whole load with [`AnalysisError::MalformedTable`].

use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use hawkdove_types::Metric;
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Shape a freshly loaded table must have.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpectedShape {
    /// Metric whose stride applies.
    pub metric: Metric,
    /// Number of agents, if known in advance.
    pub agents: Option<usize>,
}

/// Options controlling how a table is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Skip one header line before the data.
    pub headers: bool,
    /// Validate the column count right after loading.
    pub expect: Option<ExpectedShape>,
}

impl LoadOptions {
    /// Options for a table of `metric`, optionally with a known agent count.
    pub const fn for_metric(headers: bool, metric: Metric, agents: Option<usize>) -> Self {
        Self {
            headers,
            expect: Some(ExpectedShape { metric, agents }),
        }
    }
}

/// An immutable numeric table loaded from one CSV file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunTable {
    path: PathBuf,
    columns: usize,
    cells: Vec<f64>,
}

impl RunTable {
    /// Load a table from disk.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::FileNotFound`] if `path` does not exist.
    /// - [`AnalysisError::MalformedTable`] on ragged rows or non-numeric
    ///   cells.
    /// - [`AnalysisError::EmptyInput`] if the file holds no data rows.
    /// - [`AnalysisError::ShapeMismatch`] if `options.expect` is violated.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let file = File::open(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                AnalysisError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                AnalysisError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(options.headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let mut columns: Option<usize> = None;
        let mut cells = Vec::new();

        for record in reader.records() {
            let record = record.map_err(|e| AnalysisError::MalformedTable {
                path: path.to_path_buf(),
                line: e.position().map_or(0, csv::Position::line),
                reason: e.to_string(),
            })?;
            let line = record.position().map_or(0, csv::Position::line);

            match columns {
                None => columns = Some(record.len()),
                Some(expected) if expected != record.len() => {
                    return Err(AnalysisError::MalformedTable {
                        path: path.to_path_buf(),
                        line,
                        reason: format!("expected {expected} cells, found {}", record.len()),
                    });
                }
                Some(_) => {}
            }

            for (column, field) in record.iter().enumerate() {
                let value: f64 = field.parse().map_err(|_e: std::num::ParseFloatError| {
                    AnalysisError::MalformedTable {
                        path: path.to_path_buf(),
                        line,
                        reason: format!("non-numeric cell `{field}` in column {column}"),
                    }
                })?;
                cells.push(value);
            }
        }

        let columns = columns
            .filter(|c| *c > 0)
            .ok_or_else(|| AnalysisError::empty(format!("no data rows in {}", path.display())))?;

        let table = Self {
            path: path.to_path_buf(),
            columns,
            cells,
        };

        if let Some(expect) = options.expect {
            table.agent_count(expect.metric, expect.agents)?;
        }

        debug!(
            path = %table.path.display(),
            rows = table.rows(),
            columns = table.columns,
            "table loaded"
        );
        Ok(table)
    }

    /// Build a table from in-memory rows, applying the same validation as
    /// [`RunTable::load`].
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptyInput`] for no rows or zero-width rows,
    /// [`AnalysisError::MalformedTable`] for ragged rows.
    pub fn from_rows(path: impl Into<PathBuf>, rows: &[Vec<f64>]) -> Result<Self> {
        let path = path.into();
        let columns = rows
            .first()
            .map(Vec::len)
            .filter(|c| *c > 0)
            .ok_or_else(|| AnalysisError::empty(format!("no data rows in {}", path.display())))?;

        let mut cells = Vec::with_capacity(columns.saturating_mul(rows.len()));
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns {
                return Err(AnalysisError::MalformedTable {
                    path,
                    line: u64::try_from(i.saturating_add(1)).unwrap_or(u64::MAX),
                    reason: format!("expected {columns} cells, found {}", row.len()),
                });
            }
            cells.extend_from_slice(row);
        }

        Ok(Self {
            path,
            columns,
            cells,
        })
    }

    /// Path the table was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.cells.len().checked_div(self.columns).unwrap_or(0)
    }

    /// Number of columns.
    pub const fn columns(&self) -> usize {
        self.columns
    }

    /// One row, if in range.
    pub fn row(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.columns)?;
        let end = start.checked_add(self.columns)?;
        self.cells.get(start..end)
    }

    /// The last row (final state of the run).
    pub fn last_row(&self) -> Option<&[f64]> {
        self.rows().checked_sub(1).and_then(|last| self.row(last))
    }

    /// Iterate over rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks_exact(self.columns)
    }

    /// One cell, if in range.
    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        if column >= self.columns {
            return None;
        }
        self.row(row).and_then(|r| r.get(column).copied())
    }

    /// A whole column top to bottom, if in range.
    pub fn column(&self, column: usize) -> Option<Vec<f64>> {
        if column >= self.columns {
            return None;
        }
        self.iter_rows().map(|r| r.get(column).copied()).collect()
    }

    /// Number of agents implied by `metric`'s stride, checked against an
    /// expected count.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::ShapeMismatch`] if the column count is not a
    /// multiple of the stride or disagrees with `expected_agents`.
    pub fn agent_count(&self, metric: Metric, expected_agents: Option<usize>) -> Result<usize> {
        let stride = metric.stride();
        let context = || format!("{metric} table {}", self.path.display());

        if self.columns % stride != 0 {
            return Err(AnalysisError::shape(
                context(),
                format!(
                    "{} columns is not a multiple of stride {stride}",
                    self.columns
                ),
            ));
        }
        let agents = self.columns / stride;

        if let Some(expected) = expected_agents {
            if metric.per_agent() && expected != agents {
                return Err(AnalysisError::shape(
                    context(),
                    format!(
                        "expected {expected} agents x stride {stride} = {} columns, found {}",
                        expected.saturating_mul(stride),
                        self.columns
                    ),
                ));
            }
        }
        Ok(agents)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_rectangular_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "OutScore_0.csv", "1,2\n3,4\n5,6\n");
        let table = RunTable::load(&path, &LoadOptions::default()).unwrap();
        assert_eq!(table.rows(), 3);
        assert_eq!(table.columns(), 2);
        assert_eq!(table.row(1).unwrap(), &[3.0, 4.0]);
        assert_eq!(table.last_row().unwrap(), &[5.0, 6.0]);
        assert_eq!(table.column(1).unwrap(), vec![2.0, 4.0, 6.0]);
        assert_eq!(table.cell(2, 0), Some(5.0));
        assert_eq!(table.cell(0, 2), None);
        assert_eq!(table.path(), path.as_path());
    }

    #[test]
    fn header_line_is_skipped_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "FoxUsage_0.csv", "a0,a1\n0.5,0.25\n");
        let options = LoadOptions {
            headers: true,
            expect: None,
        };
        let table = RunTable::load(&path, &options).unwrap();
        assert_eq!(table.rows(), 1);
        assert_eq!(table.row(0).unwrap(), &[0.5, 0.25]);
    }

    #[test]
    fn header_line_without_flag_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "FoxUsage_0.csv", "a0,a1\n0.5,0.25\n");
        let err = RunTable::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedTable { line: 1, .. }));
    }

    #[test]
    fn missing_file_is_reported_with_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("NetSTD_0.csv");
        let err = RunTable::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::FileNotFound { path: p } if p == path));
    }

    #[test]
    fn ragged_rows_fail_without_partial_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "Morality_0.csv", "1,2,3\n4,5\n6,7,8\n");
        let err = RunTable::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedTable { line: 2, .. }));
        assert!(
            err.to_string().contains("expected 3 cells, found 2"),
            "{err}"
        );
    }

    #[test]
    fn non_numeric_cell_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "TotalPayoff_0.csv", "1,2\n3,x\n");
        let err = RunTable::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("non-numeric cell `x`"), "{err}");
    }

    #[test]
    fn empty_file_is_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "OutScore_0.csv", "");
        let err = RunTable::load(&path, &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput { .. }));
    }

    #[test]
    fn stride_is_validated_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "StrategyVisit_0.csv", "1,2,3,4\n");
        let options = LoadOptions::for_metric(false, Metric::StrategyVisit, None);
        let err = RunTable::load(&path, &options).unwrap_err();
        assert!(matches!(err, AnalysisError::ShapeMismatch { .. }));
    }

    #[test]
    fn agent_count_checks_expected_population() {
        let table =
            RunTable::from_rows("StrategyHost_0.csv", &[vec![0.9, 0.1, 0.2, 0.8]]).unwrap();
        assert_eq!(table.agent_count(Metric::StrategyHost, Some(2)).unwrap(), 2);
        assert!(table.agent_count(Metric::StrategyHost, Some(3)).is_err());
        assert_eq!(table.agent_count(Metric::OutScore, None).unwrap(), 4);
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = RunTable::from_rows("x.csv", &[vec![1.0], vec![1.0, 2.0]]).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedTable { line: 2, .. }));
        assert!(RunTable::from_rows("x.csv", &[]).is_err());
    }
}
