//! Reductions over run tables and final-state snapshots.
//!
//! Cumulative shares (Lorenz curves), NaN-aware means across runs, strict
//! threshold classification, and rank ordering. Nothing here reads files.

use std::cmp::Ordering;

use crate::error::{AnalysisError, Result};
use crate::table::RunTable;

/// Sort ascending, take the running sum, and divide by the total.
///
/// The result has the same length as `values`, is non-decreasing, and ends
/// at `1.0`.
///
/// # Errors
///
/// - [`AnalysisError::EmptyInput`] for an empty slice.
/// - [`AnalysisError::NonFinite`] if any value is NaN or infinite.
/// - [`AnalysisError::ShapeMismatch`] if any value is negative, or the sum
///   overflows.
/// - [`AnalysisError::DegenerateRange`] if the values sum to zero.
pub fn cumulative_share(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(AnalysisError::empty("cumulative share of no values"));
    }
    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(AnalysisError::NonFinite {
            context: "cumulative share".to_owned(),
            index,
        });
    }

    if let Some(index) = values.iter().position(|v| *v < 0.0) {
        return Err(AnalysisError::shape(
            "cumulative share",
            format!("negative value at index {index}"),
        ));
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut running = 0.0_f64;
    let sums: Vec<f64> = sorted
        .iter()
        .map(|v| {
            running += v;
            running
        })
        .collect();

    if !running.is_finite() {
        return Err(AnalysisError::shape("cumulative share", "total overflows"));
    }
    if running <= 0.0 {
        return Err(AnalysisError::DegenerateRange {
            context: "cumulative share".to_owned(),
            value: running,
        });
    }
    Ok(sums.iter().map(|s| s / running).collect())
}

/// Lorenz curve of `values` in percent: `(0, 0)` followed by one point per
/// value, `x` the cumulative population share and `y` the cumulative share
/// of the total.
///
/// # Errors
///
/// As [`cumulative_share`].
#[allow(clippy::cast_precision_loss)]
pub fn lorenz_curve(values: &[f64]) -> Result<Vec<(f64, f64)>> {
    let shares = cumulative_share(values)?;
    let n = shares.len() as f64;
    let mut points = Vec::with_capacity(shares.len().saturating_add(1));
    points.push((0.0, 0.0));
    for (i, share) in shares.iter().enumerate() {
        let x = (i.saturating_add(1)) as f64 / n * 100.0;
        points.push((x, share * 100.0));
    }
    Ok(points)
}

/// Arithmetic mean ignoring NaN entries.
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if there is no non-NaN value.
#[allow(clippy::cast_precision_loss)]
pub fn mean_across_runs(values: &[f64]) -> Result<f64> {
    let (sum, count) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0_f64, 0_usize), |(sum, count), v| {
            (sum + v, count.saturating_add(1))
        });
    if count == 0 {
        return Err(AnalysisError::empty("mean across runs: no present values"));
    }
    Ok(sum / count as f64)
}

/// Column-wise NaN-aware mean of equally long rows. A column with no
/// present value yields NaN.
///
/// # Errors
///
/// - [`AnalysisError::EmptyInput`] for no rows.
/// - [`AnalysisError::ShapeMismatch`] for ragged rows.
pub fn nanmean_columns(rows: &[Vec<f64>]) -> Result<Vec<f64>> {
    let width = rows
        .first()
        .map(Vec::len)
        .ok_or_else(|| AnalysisError::empty("column mean of no rows"))?;
    if let Some(bad) = rows.iter().position(|r| r.len() != width) {
        return Err(AnalysisError::shape(
            "column mean",
            format!("row {bad} differs from width {width}"),
        ));
    }
    Ok((0..width)
        .map(|c| {
            let column: Vec<f64> = rows.iter().filter_map(|r| r.get(c).copied()).collect();
            mean_across_runs(&column).unwrap_or(f64::NAN)
        })
        .collect())
}

/// Mean over every cell of the table except the first and last rows.
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if fewer than three rows remain to trim.
#[allow(clippy::cast_precision_loss)]
pub fn trimmed_mean(table: &RunTable) -> Result<f64> {
    let rows = table.rows();
    if rows < 3 || table.columns() == 0 {
        return Err(AnalysisError::empty(format!(
            "trimmed mean of {} needs at least 3 rows, found {rows}",
            table.path().display()
        )));
    }
    let inner = rows.saturating_sub(2);
    let (sum, count) = table
        .iter_rows()
        .skip(1)
        .take(inner)
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, count), v| {
            (sum + v, count.saturating_add(1))
        });
    Ok(sum / count as f64)
}

/// Element-wise `a > cutoff && b > cutoff`.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] if the slices differ in length.
pub fn threshold_classify(a: &[f64], b: &[f64], cutoff: f64) -> Result<Vec<bool>> {
    if a.len() != b.len() {
        return Err(AnalysisError::shape(
            "threshold classification",
            format!("{} values against {}", a.len(), b.len()),
        ));
    }
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| *x > cutoff && *y > cutoff)
        .collect())
}

/// Percentage of `population` flagged true.
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] if `population` is zero.
#[allow(clippy::cast_precision_loss)]
pub fn share_percent(flags: &[bool], population: usize) -> Result<f64> {
    if population == 0 {
        return Err(AnalysisError::empty("share of an empty population"));
    }
    let count = flags.iter().filter(|f| **f).count();
    Ok(count as f64 / population as f64 * 100.0)
}

/// Indices that sort `values` ascending. Ties keep their input order.
pub fn rank_order(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| match (values.get(a), values.get(b)) {
        (Some(x), Some(y)) => x.total_cmp(y),
        _ => Ordering::Equal,
    });
    order
}

/// Shrink every row to at most `max` columns by averaging equal bins.
///
/// Rows already within `max` are returned unchanged. NaN cells are
/// skipped when averaging.
///
/// # Errors
///
/// [`AnalysisError::ShapeMismatch`] if `max` is zero.
pub fn downsample_columns(matrix: &[Vec<f64>], max: usize) -> Result<Vec<Vec<f64>>> {
    if max == 0 {
        return Err(AnalysisError::shape("downsample", "column cap must be at least 1"));
    }
    Ok(matrix
        .iter()
        .map(|row| {
            if row.len() <= max {
                return row.clone();
            }
            let bin = row.len().div_ceil(max);
            row.chunks(bin)
                .map(|chunk| mean_across_runs(chunk).unwrap_or(f64::NAN))
                .collect()
        })
        .collect())
}
