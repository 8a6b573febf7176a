//! Line plots.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::canvas::{self, Drawing};
use crate::error::{RenderError, Result};
use crate::spec::{FigureSpec, LineKind, PlotSeries};

/// Dash length and gap, in pixels.
const DASH: (u32, u32) = (10, 6);
const DOT: (u32, u32) = (2, 4);

struct Lines<'a> {
    spec: &'a FigureSpec,
    series: &'a [PlotSeries],
    x: (f64, f64),
    y: (f64, f64),
}

impl Drawing for Lines<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let mut chart = canvas::build_chart(root, self.spec, self.x, self.y)?;
        canvas::draw_axes(&mut chart, self.spec)?;

        for (index, series) in self.series.iter().enumerate() {
            let color = series
                .style
                .color
                .unwrap_or_else(|| self.spec.palette.color(index))
                .to_plotters();
            let style = color.stroke_width(series.style.width);
            let points: Vec<(f64, f64)> = series
                .points
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect();

            let annotation = match series.style.line {
                LineKind::Solid => chart.draw_series(LineSeries::new(points, style))?,
                LineKind::Dashed => {
                    chart.draw_series(DashedLineSeries::new(points, DASH.0, DASH.1, style))?
                }
                LineKind::Dotted => {
                    chart.draw_series(DashedLineSeries::new(points, DOT.0, DOT.1, style))?
                }
            };
            if !series.label.is_empty() {
                annotation
                    .label(series.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], style));
            }
        }

        canvas::draw_legend(&mut chart, self.spec)
    }
}

/// Draw `series` as lines into `path`.
///
/// Axis ranges not fixed by `spec` fit the finite points of every series.
///
/// # Errors
///
/// [`RenderError::InvalidData`] when there is nothing finite to draw, and
/// any backend or file failure.
pub fn render_lines(path: &Path, spec: &FigureSpec, series: &[PlotSeries]) -> Result<()> {
    if series.iter().all(|s| s.points.is_empty()) {
        return Err(RenderError::InvalidData(format!(
            "line figure {:?} has no points",
            spec.title
        )));
    }
    let points = || series.iter().flat_map(|s| s.points.iter().copied());
    let x = canvas::axis_range(&spec.x, points().map(|(x, _)| x))?;
    let y = canvas::axis_range(&spec.y, points().map(|(_, y)| y))?;

    canvas::render_to(path, spec.size, &Lines { spec, series, x, y })?;
    debug!(path = %path.display(), series = series.len(), "rendered line figure");
    Ok(())
}
