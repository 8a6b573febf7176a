//! Bar charts with one labelled category per bar.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::canvas::{self, Drawing};
use crate::error::{RenderError, Result};
use crate::spec::{Bar, FigureSpec, Tick};

/// Half the width of a bar in category units.
const HALF_WIDTH: f64 = 0.4;

struct Bars<'a> {
    spec: FigureSpec,
    bars: &'a [Bar],
    y: (f64, f64),
}

impl Drawing for Bars<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        let x = (-0.5, self.bars.len() as f64 - 0.5);
        let mut chart = canvas::build_chart(root, &self.spec, x, self.y)?;
        canvas::draw_axes(&mut chart, &self.spec)?;

        chart.draw_series(self.bars.iter().enumerate().map(|(index, bar)| {
            let center = index as f64;
            let color = bar.color.unwrap_or_else(|| self.spec.palette.color(index));
            Rectangle::new(
                [(center - HALF_WIDTH, 0.0), (center + HALF_WIDTH, bar.value)],
                color.to_plotters().filled(),
            )
        }))?;
        Ok(())
    }
}

/// Draw `bars` left to right into `path`.
///
/// Bars are labelled with their own labels unless `spec` names x ticks.
/// The y range always includes zero.
///
/// # Errors
///
/// [`RenderError::InvalidData`] for no bars or a non-finite value, and any
/// backend or file failure.
#[allow(clippy::cast_precision_loss)]
pub fn render_bars(path: &Path, spec: &FigureSpec, bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(RenderError::InvalidData(format!("bar figure {:?} has no bars", spec.title)));
    }
    if let Some(bar) = bars.iter().find(|b| !b.value.is_finite()) {
        return Err(RenderError::InvalidData(format!(
            "bar {:?} has value {}",
            bar.label, bar.value
        )));
    }

    let mut spec = spec.clone();
    if spec.x.ticks.is_empty() {
        spec.x.ticks = bars
            .iter()
            .enumerate()
            .map(|(index, bar)| Tick::new(index as f64, bar.label.as_str()))
            .collect();
    }
    let y = canvas::axis_range(&spec.y, bars.iter().map(|b| b.value).chain([0.0]))?;

    let size = spec.size;
    canvas::render_to(path, size, &Bars { spec, bars, y })?;
    debug!(path = %path.display(), bars = bars.len(), "rendered bar figure");
    Ok(())
}
