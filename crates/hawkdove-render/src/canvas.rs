//! Backend selection and the chart scaffolding shared by every renderer.

use std::ffi::OsStr;
use std::path::Path;

use plotters::coord::Shift;
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::full_palette::GREY_800;

use crate::error::{RenderError, Result};
use crate::spec::{AxisPosition, AxisSpec, FigureSpec};

/// Chart with tick positions pinned on both axes.
pub(crate) type Chart<'a, DB> =
    ChartContext<'a, DB, Cartesian2d<WithKeyPoints<RangedCoordf64>, WithKeyPoints<RangedCoordf64>>>;

/// Evenly spaced ticks used when an axis names none.
const AUTO_TICKS: usize = 6;

/// Something that can draw itself onto any backend.
pub(crate) trait Drawing {
    /// Draw onto a white root area.
    fn draw<DB: DrawingBackend>(&self, root: &DrawingArea<DB, Shift>) -> Result<()>;
}

/// Draw `drawing` into `path`, choosing the backend from the extension.
pub(crate) fn render_to(path: &Path, size: (u32, u32), drawing: &impl Drawing) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("svg") => present(&SVGBackend::new(path, size).into_drawing_area(), drawing),
        #[cfg(feature = "bitmap")]
        Some("png") => present(&BitMapBackend::new(path, size).into_drawing_area(), drawing),
        #[cfg(not(feature = "bitmap"))]
        Some("png") => Err(RenderError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "PNG output needs the `bitmap` feature".to_owned(),
        }),
        _ => Err(RenderError::UnsupportedFormat {
            path: path.to_path_buf(),
            reason: "expected an .svg or .png file name".to_owned(),
        }),
    }
}

fn present<DB: DrawingBackend>(root: &DrawingArea<DB, Shift>, drawing: &impl Drawing) -> Result<()> {
    root.fill(&WHITE)?;
    drawing.draw(root)?;
    root.present()?;
    Ok(())
}

/// Fixed range of `axis`, or the extent of the finite `data` with a small margin.
pub(crate) fn axis_range(axis: &AxisSpec, data: impl Iterator<Item = f64>) -> Result<(f64, f64)> {
    if let Some((low, high)) = axis.range {
        if !(low.is_finite() && high.is_finite() && low < high) {
            return Err(RenderError::InvalidData(format!(
                "axis {:?} has empty range {low}..{high}",
                axis.label
            )));
        }
        return Ok((low, high));
    }
    let (low, high) = data
        .filter(|v| v.is_finite())
        .fold(None, |acc: Option<(f64, f64)>, v| {
            Some(acc.map_or((v, v), |(lo, hi)| (lo.min(v), hi.max(v))))
        })
        .ok_or_else(|| {
            RenderError::InvalidData(format!("no finite values for axis {:?}", axis.label))
        })?;
    let span = high - low;
    if span > 0.0 {
        let pad = span * 0.05;
        Ok((low - pad, high + pad))
    } else {
        Ok((low - 0.5, high + 0.5))
    }
}

/// Tick positions: the axis's own, or evenly spaced across `range`.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn key_points(axis: &AxisSpec, range: (f64, f64)) -> Vec<f64> {
    if !axis.ticks.is_empty() {
        return axis.ticks.iter().map(|t| t.value).collect();
    }
    let steps = AUTO_TICKS.saturating_sub(1) as f64;
    (0..AUTO_TICKS)
        .map(|i| range.0 + (range.1 - range.0) * (i as f64) / steps)
        .collect()
}

/// Label of the tick at `value`.
pub(crate) fn tick_label(axis: &AxisSpec, value: f64) -> String {
    axis.ticks
        .iter()
        .find(|t| (t.value - value).abs() <= 1e-9)
        .map_or_else(|| number_label(value), |t| t.label.clone())
}

fn number_label(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" { "0".to_owned() } else { text.to_owned() }
}

/// Build a chart on `area` with the figure's caption, label areas and ticks.
pub(crate) fn build_chart<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    spec: &FigureSpec,
    x: (f64, f64),
    y: (f64, f64),
) -> Result<Chart<'a, DB>> {
    let mut builder = ChartBuilder::on(area);
    builder.margin(15).x_label_area_size(50);
    match spec.y.position {
        AxisPosition::Default => builder.y_label_area_size(70),
        AxisPosition::Right => builder.right_y_label_area_size(70),
    };
    if !spec.title.is_empty() {
        builder.caption(&spec.title, ("sans-serif", 20));
    }
    let chart = builder.build_cartesian_2d(
        (x.0..x.1).with_key_points(key_points(&spec.x, x)),
        (y.0..y.1).with_key_points(key_points(&spec.y, y)),
    )?;
    Ok(chart)
}

/// Axis lines, tick labels and axis descriptions; no grid.
pub(crate) fn draw_axes<DB: DrawingBackend>(chart: &mut Chart<'_, DB>, spec: &FigureSpec) -> Result<()> {
    let x_format = |v: &f64| tick_label(&spec.x, *v);
    let y_format = |v: &f64| tick_label(&spec.y, *v);
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(GREY_800)
        .x_desc(spec.x.label.as_str())
        .y_desc(spec.y.label.as_str())
        .x_labels(spec.x.ticks.len().max(AUTO_TICKS))
        .y_labels(spec.y.ticks.len().max(AUTO_TICKS))
        .x_label_formatter(&x_format)
        .y_label_formatter(&y_format)
        .draw()?;
    Ok(())
}

/// Legend box, when the figure asks for one.
pub(crate) fn draw_legend<'a, DB: DrawingBackend + 'a>(chart: &mut Chart<'a, DB>, spec: &FigureSpec) -> Result<()> {
    if spec.legend.show {
        chart
            .configure_series_labels()
            .position(spec.legend.position.to_plotters())
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::spec::Tick;

    #[test]
    fn range_pads_data_extent() {
        let axis = AxisSpec::default();
        let (low, high) = axis_range(&axis, [0.0, 10.0, f64::NAN].into_iter()).unwrap();
        assert!((low + 0.5).abs() < 1e-12);
        assert!((high - 10.5).abs() < 1e-12);
        assert_eq!(axis_range(&axis, [3.0].into_iter()).unwrap(), (2.5, 3.5));
        assert!(axis_range(&axis, std::iter::empty()).is_err());
    }

    #[test]
    fn fixed_range_wins_and_is_checked() {
        let axis = AxisSpec::default().with_range(-0.05, 1.05);
        assert_eq!(axis_range(&axis, [7.0].into_iter()).unwrap(), (-0.05, 1.05));
        let inverted = AxisSpec::default().with_range(1.0, 0.0);
        assert!(axis_range(&inverted, std::iter::empty()).is_err());
    }

    #[test]
    fn tick_labels_prefer_named_ticks() {
        let axis = AxisSpec::default().with_ticks(vec![Tick::new(0.0, "Minimum"), Tick::new(1.0, "Maximum")]);
        assert_eq!(key_points(&axis, (0.0, 1.0)), vec![0.0, 1.0]);
        assert_eq!(tick_label(&axis, 1.0), "Maximum");
        assert_eq!(tick_label(&axis, 0.5), "0.5");
        assert_eq!(number_label(20.0), "20");
        assert_eq!(number_label(-0.001), "0");
    }

    #[test]
    fn auto_ticks_span_range() {
        let points = key_points(&AxisSpec::default(), (0.0, 1.0));
        assert_eq!(points.len(), AUTO_TICKS);
        assert_eq!(points.first().copied(), Some(0.0));
        assert_eq!(points.last().copied(), Some(1.0));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        struct Nothing;
        impl Drawing for Nothing {
            fn draw<DB: DrawingBackend>(&self, _root: &DrawingArea<DB, Shift>) -> Result<()> {
                Ok(())
            }
        }
        let dir = tempfile::tempdir().unwrap();
        let err = render_to(&dir.path().join("figure.pdf"), (10, 10), &Nothing).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedFormat { .. }));
    }
}
