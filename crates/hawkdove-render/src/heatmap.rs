//! Matrix heatmaps.
//!
//! Row 0 is drawn at the top. Columns share the horizontal extent evenly.
//! Colours come from a fixed value domain so several heatmaps stay
//! comparable; values outside it clamp to the colormap ends.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::debug;

use crate::canvas::{self, Drawing};
use crate::color::Colormap;
use crate::error::{RenderError, Result};
use crate::spec::{FigureSpec, Heatmap, Tick};

/// Width reserved for the colour bar, in pixels.
const COLORBAR_WIDTH: u32 = 110;
/// Gradient steps drawn in the colour bar.
const COLORBAR_STEPS: u32 = 64;

struct Cells<'a> {
    spec: FigureSpec,
    heatmap: &'a Heatmap,
    colormap: &'a Colormap,
    columns: usize,
}

impl Cells<'_> {
    #[allow(clippy::cast_precision_loss)]
    fn draw_matrix<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>) -> Result<()> {
        let rows = self.heatmap.rows.len() as f64;
        let (x0, x1) = self.heatmap.x_extent;
        let width = (x1 - x0) / self.columns as f64;

        let mut chart = canvas::build_chart(area, &self.spec, (x0, x1), (0.0, rows))?;
        chart.draw_series(self.heatmap.rows.iter().enumerate().flat_map(|(i, row)| {
            let top = rows - i as f64;
            row.iter().enumerate().map(move |(j, &value)| {
                let left = x0 + width * j as f64;
                let color = self.colormap.map(value, self.heatmap.domain);
                Rectangle::new([(left, top - 1.0), (left + width, top)], color.to_plotters().filled())
            })
        }))?;
        canvas::draw_axes(&mut chart, &self.spec)
    }

    fn draw_colorbar<DB: DrawingBackend>(&self, area: &DrawingArea<DB, Shift>, label: &str) -> Result<()> {
        let (low, high) = self.heatmap.domain;
        let mut chart = ChartBuilder::on(area)
            .margin_top(50)
            .margin_bottom(65)
            .margin_right(10)
            .right_y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, low..high)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc(label)
            .y_labels(5)
            .draw()?;

        let step = (high - low) / f64::from(COLORBAR_STEPS);
        chart.draw_series((0..COLORBAR_STEPS).map(|i| {
            let bottom = low + step * f64::from(i);
            let color = self.colormap.map(bottom + step / 2.0, self.heatmap.domain);
            Rectangle::new([(0.0, bottom), (1.0, bottom + step)], color.to_plotters().filled())
        }))?;
        Ok(())
    }
}

impl Drawing for Cells<'_> {
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()> {
        match &self.heatmap.colorbar_label {
            Some(label) => {
                let (width, _) = root.dim_in_pixel();
                let (matrix, bar) = root.split_horizontally(width.saturating_sub(COLORBAR_WIDTH));
                self.draw_matrix(&matrix)?;
                self.draw_colorbar(&bar, label)
            }
            None => self.draw_matrix(root),
        }
    }
}

/// Draw `heatmap` into `path` with `colormap`.
///
/// Without explicit y ticks, rows are labelled 1, 2, ... from the top.
///
/// # Errors
///
/// [`RenderError::InvalidData`] for an empty or ragged matrix, an empty
/// domain or extent, and any backend or file failure.
#[allow(clippy::cast_precision_loss)]
pub fn render_heatmap(path: &Path, spec: &FigureSpec, heatmap: &Heatmap, colormap: &Colormap) -> Result<()> {
    let columns = heatmap.rows.first().map_or(0, Vec::len);
    if columns == 0 {
        return Err(RenderError::InvalidData(format!("heatmap {:?} is empty", spec.title)));
    }
    if let Some(i) = heatmap.rows.iter().position(|row| row.len() != columns) {
        return Err(RenderError::InvalidData(format!(
            "heatmap row {i} does not have {columns} columns"
        )));
    }
    let (low, high) = heatmap.domain;
    if !(low.is_finite() && high.is_finite() && low < high) {
        return Err(RenderError::InvalidData(format!("heatmap domain {low}..{high} is empty")));
    }
    let (left, right) = heatmap.x_extent;
    if !(left.is_finite() && right.is_finite() && left < right) {
        return Err(RenderError::InvalidData(format!("heatmap extent {left}..{right} is empty")));
    }

    let rows = heatmap.rows.len();
    let mut spec = spec.clone();
    spec.legend.show = false;
    if spec.y.ticks.is_empty() {
        spec.y.ticks = (0..rows)
            .map(|i| Tick::new(rows as f64 - i as f64 - 0.5, i.saturating_add(1).to_string()))
            .collect();
    }

    let size = spec.size;
    canvas::render_to(path, size, &Cells { spec, heatmap, colormap, columns })?;
    debug!(path = %path.display(), rows, columns, "rendered heatmap");
    Ok(())
}
