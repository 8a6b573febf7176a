//! Typeset table export.
//!
//! Produces a `table[H]` float wrapping a ruled `tabular`, one line per input
//! row. Numbers are printed with two decimals, rounding half away from zero
//! on the shortest decimal form of the value, so `1.005` prints as `1.01`
//! even though its binary value sits slightly below the midpoint.

use std::fmt::Write as _;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Decimal places printed for numeric cells.
const DECIMALS: u32 = 2;

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Printed with two decimals.
    Number(f64),
    /// Printed verbatim.
    Text(String),
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Caption, label, and column alignment of an exported table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableOptions {
    /// `\caption{..}`, omitted when absent or empty.
    #[serde(default)]
    pub caption: Option<String>,
    /// `\label{..}`, omitted when absent or empty.
    #[serde(default)]
    pub label: Option<String>,
    /// One alignment character for every column, or one per column.
    #[serde(default = "default_alignment")]
    pub alignment: String,
}

fn default_alignment() -> String {
    "c".to_owned()
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            caption: None,
            label: None,
            alignment: default_alignment(),
        }
    }
}

impl TableOptions {
    /// Column format string such as `|c|c|c|`.
    fn column_format(&self, columns: usize) -> String {
        let chars: Vec<char> = self.alignment.chars().collect();
        let spec: Vec<String> = match chars.as_slice() {
            [single] => vec![single.to_string(); columns],
            many if many.len() == columns => many.iter().map(char::to_string).collect(),
            _ => vec!["c".to_owned(); columns],
        };
        format!("|{}|", spec.join("|"))
    }
}

/// Format a number to two decimals, rounding half away from zero.
pub fn format_two_decimals(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        let text = if value.is_sign_negative() { "-inf" } else { "inf" };
        return text.to_owned();
    }
    match Decimal::from_str(&value.to_string()) {
        Ok(decimal) => {
            let mut rounded =
                decimal.round_dp_with_strategy(DECIMALS, RoundingStrategy::MidpointAwayFromZero);
            rounded.rescale(DECIMALS);
            rounded.to_string()
        }
        // Outside Decimal's range: plain formatting is exact enough there.
        Err(_) => format!("{value:.2}"),
    }
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(value) => format_two_decimals(*value),
        Cell::Text(text) => text.clone(),
    }
}

/// Render `rows` as a LaTeX table.
///
/// # Errors
///
/// - [`AnalysisError::EmptyInput`] for no rows.
/// - [`AnalysisError::MalformedTable`] if rows differ in length; `line` is
///   the one-based index of the first offending row.
pub fn to_latex_table(rows: &[Vec<Cell>], options: &TableOptions) -> Result<String> {
    let columns = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| AnalysisError::empty("table export of no rows"))?;
    if let Some(bad) = rows.iter().position(|r| r.len() != columns) {
        let width = rows.get(bad).map_or(0, Vec::len);
        return Err(AnalysisError::MalformedTable {
            path: "<table export>".into(),
            line: u64::try_from(bad).unwrap_or(u64::MAX).saturating_add(1),
            reason: format!("row has {width} cells, first row has {columns}"),
        });
    }

    let mut out = String::new();
    out.push_str("\\begin{table}[H]\n");
    out.push_str("    \\centering\n");
    if let Some(caption) = options.caption.as_deref().filter(|c| !c.is_empty()) {
        let _ = writeln!(out, "    \\caption{{{caption}}}");
    }
    if let Some(label) = options.label.as_deref().filter(|l| !l.is_empty()) {
        let _ = writeln!(out, "    \\label{{{label}}}");
    }
    let _ = writeln!(
        out,
        "    \\begin{{tabular}}{{{}}}",
        options.column_format(columns)
    );
    out.push_str("        \\hline\n");
    for row in rows {
        let cells: Vec<String> = row.iter().map(render_cell).collect();
        let _ = writeln!(out, "        {} \\\\", cells.join(" & "));
        out.push_str("        \\hline\n");
    }
    out.push_str("    \\end{tabular}\n");
    out.push_str("\\end{table}\n");
    Ok(out)
}

/// Convert a numeric matrix into cells.
pub fn numeric_rows(matrix: &[Vec<f64>]) -> Vec<Vec<Cell>> {
    matrix
        .iter()
        .map(|row| row.iter().copied().map(Cell::Number).collect())
        .collect()
}
