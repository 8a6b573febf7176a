//! Figure descriptions.
//!
//! A [`FigureSpec`] carries everything about a chart that is styling rather
//! than data. Specs deserialize from configuration with defaults for every
//! field, so a figure override only names what it changes.

use plotters::chart::SeriesLabelPosition;
use serde::{Deserialize, Serialize};

use crate::color::{Palette, Rgb};

/// Title, size, axes, legend and palette of one figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
    /// Caption drawn above the plotting area. Empty for none.
    #[serde(default)]
    pub title: String,
    /// Output size in pixels, width then height.
    #[serde(default = "default_size")]
    pub size: (u32, u32),
    /// Horizontal axis.
    #[serde(default)]
    pub x: AxisSpec,
    /// Vertical axis.
    #[serde(default)]
    pub y: AxisSpec,
    /// Series legend.
    #[serde(default)]
    pub legend: LegendSpec,
    /// Colours assigned to series without an explicit colour.
    #[serde(default)]
    pub palette: Palette,
}

const fn default_size() -> (u32, u32) {
    (800, 600)
}

impl Default for FigureSpec {
    fn default() -> Self {
        Self {
            title: String::new(),
            size: default_size(),
            x: AxisSpec::default(),
            y: AxisSpec::default(),
            legend: LegendSpec::default(),
            palette: Palette::default(),
        }
    }
}

impl FigureSpec {
    /// A default spec with a title.
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// One axis: label, range and explicit ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AxisSpec {
    /// Axis description. Empty for none.
    #[serde(default)]
    pub label: String,
    /// Fixed range. When absent the renderer fits the data.
    #[serde(default)]
    pub range: Option<(f64, f64)>,
    /// Tick positions and labels. When empty, ticks are evenly spaced.
    #[serde(default)]
    pub ticks: Vec<Tick>,
    /// Which side the axis is drawn on.
    #[serde(default)]
    pub position: AxisPosition,
}

impl AxisSpec {
    /// An axis with a label and nothing else fixed.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// Fix the range.
    #[must_use]
    pub const fn with_range(mut self, low: f64, high: f64) -> Self {
        self.range = Some((low, high));
        self
    }

    /// Set explicit ticks.
    #[must_use]
    pub fn with_ticks(mut self, ticks: Vec<Tick>) -> Self {
        self.ticks = ticks;
        self
    }
}

/// A tick mark with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Position in data coordinates.
    pub value: f64,
    /// Text shown at the tick.
    pub label: String,
}

impl Tick {
    /// Tick at `value` labelled `label`.
    pub fn new(value: f64, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
        }
    }
}

/// Side of the plotting area an axis is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AxisPosition {
    /// Left for y, bottom for x.
    #[default]
    Default,
    /// Right-hand y axis.
    Right,
}

/// Legend visibility and placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendSpec {
    /// Draw the legend.
    #[serde(default = "default_show")]
    pub show: bool,
    /// Corner or edge to place it in.
    #[serde(default)]
    pub position: LegendPosition,
}

const fn default_show() -> bool {
    true
}

impl Default for LegendSpec {
    fn default() -> Self {
        Self {
            show: default_show(),
            position: LegendPosition::default(),
        }
    }
}

impl LegendSpec {
    /// No legend.
    pub const HIDDEN: Self = Self {
        show: false,
        position: LegendPosition::UpperRight,
    };
}

/// Legend anchor inside the plotting area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LegendPosition {
    /// Top left.
    UpperLeft,
    /// Top right.
    #[default]
    UpperRight,
    /// Bottom left.
    LowerLeft,
    /// Bottom right.
    LowerRight,
    /// Middle of the right edge.
    CenterRight,
}

impl LegendPosition {
    pub(crate) const fn to_plotters(self) -> SeriesLabelPosition {
        match self {
            Self::UpperLeft => SeriesLabelPosition::UpperLeft,
            Self::UpperRight => SeriesLabelPosition::UpperRight,
            Self::LowerLeft => SeriesLabelPosition::LowerLeft,
            Self::LowerRight => SeriesLabelPosition::LowerRight,
            Self::CenterRight => SeriesLabelPosition::MiddleRight,
        }
    }
}

/// Stroke pattern of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Continuous.
    #[default]
    Solid,
    /// Long dashes.
    Dashed,
    /// Short dots.
    Dotted,
}

/// How a series is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// Colour. When absent the palette picks by series position.
    #[serde(default)]
    pub color: Option<Rgb>,
    /// Stroke pattern.
    #[serde(default)]
    pub line: LineKind,
    /// Stroke width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,
}

const fn default_width() -> u32 {
    2
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: None,
            line: LineKind::Solid,
            width: default_width(),
        }
    }
}

impl SeriesStyle {
    /// A solid line of default width in `color`.
    pub const fn colored(color: Rgb) -> Self {
        Self {
            color: Some(color),
            line: LineKind::Solid,
            width: default_width(),
        }
    }

    /// Same style with a different stroke pattern.
    #[must_use]
    pub const fn with_line(mut self, line: LineKind) -> Self {
        self.line = line;
        self
    }
}

/// A labelled line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    /// Legend entry.
    pub label: String,
    /// Points in drawing order.
    pub points: Vec<(f64, f64)>,
    /// Stroke.
    #[serde(default)]
    pub style: SeriesStyle,
}

impl PlotSeries {
    /// A series using the palette colour and a solid stroke.
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            style: SeriesStyle::default(),
        }
    }

    /// Same series with an explicit style.
    #[must_use]
    pub const fn with_style(mut self, style: SeriesStyle) -> Self {
        self.style = style;
        self
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Category label under the bar.
    pub label: String,
    /// Bar height.
    pub value: f64,
    /// Fill. When absent the palette picks by bar position.
    #[serde(default)]
    pub color: Option<Rgb>,
}

/// A matrix drawn cell by cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Heatmap {
    /// Rows top to bottom; every row has the same length.
    pub rows: Vec<Vec<f64>>,
    /// Values mapped to the two ends of the colormap.
    pub domain: (f64, f64),
    /// Horizontal data range covered by the columns.
    pub x_extent: (f64, f64),
    /// Caption of the colour bar. No colour bar is drawn when absent.
    #[serde(default)]
    pub colorbar_label: Option<String>,
}

/// Concentric rings summarising one agent's final strategy.
///
/// The outer disc shows the visitor role, the inner disc the host role, and
/// the centre dot fox usage through its opacity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RingMarker {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Outer disc.
    pub outer: Rgb,
    /// Inner disc.
    pub inner: Rgb,
    /// Centre dot.
    pub dot: Rgb,
    /// Opacity of the centre dot in `[0, 1]`.
    pub dot_alpha: f64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let spec: FigureSpec = serde_json::from_str(
            r#"{"title": "Lorenz Curve", "y": {"label": "Cumulative Payoff (%)", "position": "right"}}"#,
        )
        .unwrap();
        assert_eq!(spec.size, (800, 600));
        assert_eq!(spec.y.position, AxisPosition::Right);
        assert!(spec.legend.show);
        assert_eq!(spec.palette, Palette::regimes());
    }

    #[test]
    fn style_reads_hex_colour() {
        let style: SeriesStyle =
            serde_json::from_str(r##"{"color": "#008000", "line": "dashed"}"##).unwrap();
        assert_eq!(style.color, Some(Rgb(0, 0x80, 0)));
        assert_eq!(style.line, LineKind::Dashed);
        assert_eq!(style.width, 2);
    }
}
