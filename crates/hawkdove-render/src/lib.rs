//! Declarative chart rendering for hawk-dove innovation figures.
//!
//! Every renderer takes a [`FigureSpec`] describing title, size, axes,
//! legend and palette, plus the data for one chart kind. Styling lives in
//! the spec value and never in code, so one renderer serves every figure of
//! its kind.
//!
//! The output format follows the file extension: `.svg` always works;
//! `.png` needs the `bitmap` feature.
//!
//! # Modules
//!
//! - [`spec`] -- [`FigureSpec`], axes, ticks, legend, and per-chart inputs.
//! - [`color`] -- [`Rgb`], cycling [`Palette`]s, interpolated [`Colormap`]s.
//! - [`line`] -- Line plots with solid, dashed and dotted series.
//! - [`bar`] -- Labelled bar charts.
//! - [`heatmap`] -- Matrix heatmaps with a fixed value domain and colour bar.
//! - [`rings`] -- Concentric ring markers on a rank grid.
//! - [`error`] -- [`RenderError`].

mod canvas;

pub mod bar;
pub mod color;
pub mod error;
pub mod heatmap;
pub mod line;
pub mod rings;
pub mod spec;

// Re-export primary types at crate root.
pub use bar::render_bars;
pub use color::{Colormap, Palette, Rgb};
pub use error::{RenderError, Result};
pub use heatmap::render_heatmap;
pub use line::render_lines;
pub use rings::render_ring_grid;
pub use spec::{
    AxisPosition, AxisSpec, Bar, FigureSpec, Heatmap, LegendPosition, LegendSpec, LineKind,
    PlotSeries, RingMarker, SeriesStyle, Tick,
};
