//! Ring marker grids: one concentric marker per agent and condition.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::canvas::{self, Chart, Drawing};
use crate::error::{RenderError, Result};
use crate::spec::{AxisSpec, FigureSpec, RingMarker};

/// Radii as fractions of one data unit.
const OUTER: f64 = 0.4;
const INNER: f64 = 0.2;
const DOT: f64 = 0.05;

/// Space kept around the outermost markers, in data units.
const PAD: f64 = 0.5;

struct Rings<'a> {
    spec: &'a FigureSpec,
    markers: &'a [RingMarker],
    x: (f64, f64),
    y: (f64, f64),
}

/// Pixels per data unit, the smaller of the two axes.
fn unit_pixels<DB: DrawingBackend>(chart: &Chart<'_, DB>, x: (f64, f64), y: (f64, f64)) -> f64 {
    let (px, py) = chart.plotting_area().get_pixel_range();
    let per_x = f64::from(px.end.saturating_sub(px.start)) / (x.1 - x.0);
    let per_y = f64::from(py.end.saturating_sub(py.start)) / (y.1 - y.0);
    per_x.min(per_y).max(0.0)
}

#[allow(clippy::cast_possible_truncation)]
fn radius(unit: f64, fraction: f64) -> i32 {
    // Bounded by the canvas size.
    (unit * fraction).round().max(1.0) as i32
}

impl Drawing for Rings<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let mut chart = canvas::build_chart(root, self.spec, self.x, self.y)?;
        canvas::draw_axes(&mut chart, self.spec)?;

        let unit = unit_pixels(&chart, self.x, self.y);
        let (outer, inner, dot) = (radius(unit, OUTER), radius(unit, INNER), radius(unit, DOT));
        for marker in self.markers {
            let at = (marker.x, marker.y);
            chart.draw_series([
                Circle::new(at, outer, marker.outer.to_plotters().filled()),
                Circle::new(at, inner, marker.inner.to_plotters().filled()),
                Circle::new(
                    at,
                    dot,
                    marker.dot.to_plotters().mix(marker.dot_alpha.clamp(0.0, 1.0)).filled(),
                ),
            ])?;
        }
        Ok(())
    }
}

/// Draw `markers` into `path`.
///
/// Axis ranges not fixed by `spec` cover every marker with half a unit to
/// spare.
///
/// # Errors
///
/// [`RenderError::InvalidData`] for no markers or a non-finite position,
/// and any backend or file failure.
pub fn render_ring_grid(path: &Path, spec: &FigureSpec, markers: &[RingMarker]) -> Result<()> {
    if markers.is_empty() {
        return Err(RenderError::InvalidData(format!("ring grid {:?} has no markers", spec.title)));
    }
    if let Some(marker) = markers.iter().find(|m| !(m.x.is_finite() && m.y.is_finite())) {
        return Err(RenderError::InvalidData(format!(
            "ring marker at ({}, {}) is not finite",
            marker.x, marker.y
        )));
    }
    let x = fit(&spec.x, markers.iter().map(|m| m.x))?;
    let y = fit(&spec.y, markers.iter().map(|m| m.y))?;

    canvas::render_to(path, spec.size, &Rings { spec, markers, x, y })?;
    debug!(path = %path.display(), markers = markers.len(), "rendered ring grid");
    Ok(())
}

fn fit(axis: &AxisSpec, values: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    if axis.range.is_some() {
        return canvas::axis_range(axis, std::iter::empty());
    }
    let (low, high) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    Ok((low - PAD, high + PAD))
}
