//! Every renderer writes a well-formed SVG file, and bad input or an
//! unknown output format is rejected before anything is drawn.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;

use hawkdove_render::{
    AxisSpec, Bar, Colormap, FigureSpec, Heatmap, LineKind, Palette, PlotSeries, RenderError,
    RingMarker, Rgb, SeriesStyle, Tick, render_bars, render_heatmap, render_lines,
    render_ring_grid,
};

fn assert_svg(path: &Path) {
    let text = fs::read_to_string(path).unwrap();
    assert!(text.contains("<svg"), "{}", path.display());
    assert!(text.trim_end().ends_with("</svg>"), "{}", path.display());
}

#[test]
fn line_figure_with_every_stroke() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cycles").join("agent_0.svg");
    let spec = FigureSpec {
        y: AxisSpec::labelled("Normalized value")
            .with_range(-0.05, 1.05)
            .with_ticks(vec![Tick::new(0.0, "Minimum"), Tick::new(1.0, "Maximum")]),
        palette: Palette::cycles(),
        ..FigureSpec::titled("Agent 0 cycles")
    };
    let ramp: Vec<(f64, f64)> = (0..10).map(|t| (f64::from(t), f64::from(t) / 9.0)).collect();
    let series = vec![
        PlotSeries::new("Rank", ramp.clone())
            .with_style(SeriesStyle::colored(Rgb::BLACK).with_line(LineKind::Dashed)),
        PlotSeries::new("Host Strategy", ramp.iter().map(|&(x, y)| (x, 1.0 - y)).collect()),
        PlotSeries::new("Fox Usage", ramp)
            .with_style(SeriesStyle::colored(Rgb(255, 0, 0)).with_line(LineKind::Dotted)),
    ];

    render_lines(&path, &spec, &series).unwrap();
    assert_svg(&path);
    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("Maximum"));
    assert!(text.contains("Fox Usage"));
}

#[test]
fn line_figure_without_points_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = render_lines(
        &dir.path().join("empty.svg"),
        &FigureSpec::default(),
        &[PlotSeries::new("nothing", Vec::new())],
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::InvalidData(_)));
    assert!(!dir.path().join("empty.svg").exists());
}

#[test]
fn bars_are_labelled_by_category() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("total_payoffs.svg");
    let bars: Vec<Bar> = ["SS", "SD", "DD", "DS"]
        .iter()
        .zip([12.5, 30.0, 8.25, 19.0])
        .map(|(label, value)| Bar {
            label: (*label).to_owned(),
            value,
            color: None,
        })
        .collect();

    render_bars(&path, &FigureSpec::titled("Total Payoffs"), &bars).unwrap();
    assert_svg(&path);
    assert!(fs::read_to_string(&path).unwrap().contains("DD"));
}

#[test]
fn heatmap_with_colorbar() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fox_weight.svg");
    let heatmap = Heatmap {
        rows: vec![vec![0.0, 0.1, 0.2], vec![0.3, 0.4, 0.5], vec![0.6, 0.7, 1.2]],
        domain: (0.0, 1.0),
        x_extent: (0.0, 300.0),
        colorbar_label: Some("Fox weight".to_owned()),
    };

    render_heatmap(&path, &FigureSpec::titled("Fox weight"), &heatmap, &Colormap::magma_r()).unwrap();
    assert_svg(&path);
    assert!(fs::read_to_string(&path).unwrap().contains("Fox weight"));
}

#[test]
fn ragged_heatmap_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let heatmap = Heatmap {
        rows: vec![vec![0.0, 0.1], vec![0.3]],
        domain: (0.0, 1.0),
        x_extent: (0.0, 1.0),
        colorbar_label: None,
    };
    let err = render_heatmap(
        &dir.path().join("ragged.svg"),
        &FigureSpec::default(),
        &heatmap,
        &Colormap::default(),
    )
    .unwrap_err();
    assert!(err.to_string().contains("row 1"), "{err}");
}

#[test]
fn ring_grid_draws_three_circles_per_marker() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rings.svg");
    let hawk = Rgb(0x70, 0x52, 0x59);
    let other = Rgb(0x16, 0x7D, 0x9C);
    let markers: Vec<RingMarker> = (1..=4)
        .map(|rank| RingMarker {
            x: f64::from(rank),
            y: 0.0,
            outer: if rank > 2 { hawk } else { other },
            inner: other,
            dot: Rgb(0xEF, 0xA0, 0x7D),
            dot_alpha: f64::from(rank) / 4.0,
        })
        .collect();

    render_ring_grid(&path, &FigureSpec::titled("staticrank_staticnet"), &markers).unwrap();
    assert_svg(&path);
    assert_eq!(fs::read_to_string(&path).unwrap().matches("<circle").count(), 12);
}

#[cfg(not(feature = "bitmap"))]
#[test]
fn png_needs_bitmap_feature() {
    let dir = tempfile::tempdir().unwrap();
    let err = render_bars(
        &dir.path().join("bars.png"),
        &FigureSpec::default(),
        &[Bar {
            label: "only".to_owned(),
            value: 1.0,
            color: None,
        }],
    )
    .unwrap_err();
    assert!(matches!(err, RenderError::UnsupportedFormat { .. }));
}
