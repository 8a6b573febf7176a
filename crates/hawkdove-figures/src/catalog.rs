//! The figures this tool knows how to make, and their default styling.
//!
//! Every image figure starts from a built-in [`FigureSpec`]. The `figures`
//! section of the configuration can replace any top-level part of it (title,
//! size, either axis, legend, palette) per figure kind.

use std::collections::BTreeMap;
use std::fmt;

use hawkdove_render::{
    AxisPosition, AxisSpec, FigureSpec, LegendPosition, LegendSpec, Palette, Rgb, Tick,
};
use serde::{Deserialize, Serialize};

/// A figure (or table) produced by one job.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum FigureKind {
    /// Share of pure hawks per population against `f`.
    PureHawks,
    /// Mean fox usage per population against `f`.
    FoxUsage,
    /// Fox weight over time, agents sorted by final rank.
    FoxWeightHeatmap,
    /// Final fox weight by rank and `f`, as a LaTeX table.
    FoxWeightTable,
    /// Lorenz curves of final payoffs per regime.
    Lorenz,
    /// Total final payoff per regime.
    TotalPayoffs,
    /// One agent's trajectory through a run.
    AgentCycles,
    /// Final strategies as ring markers over rank and `f`.
    StrategyGrid,
}

impl FigureKind {
    /// Every kind, in the order they run by default.
    pub const ALL: [Self; 8] = [
        Self::PureHawks,
        Self::FoxUsage,
        Self::FoxWeightHeatmap,
        Self::FoxWeightTable,
        Self::Lorenz,
        Self::TotalPayoffs,
        Self::AgentCycles,
        Self::StrategyGrid,
    ];

    /// Command-line and config name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::PureHawks => "pure-hawks",
            Self::FoxUsage => "fox-usage",
            Self::FoxWeightHeatmap => "fox-weight-heatmap",
            Self::FoxWeightTable => "fox-weight-table",
            Self::Lorenz => "lorenz",
            Self::TotalPayoffs => "total-payoffs",
            Self::AgentCycles => "agent-cycles",
            Self::StrategyGrid => "strategy-grid",
        }
    }

    /// One-line description for `--list`.
    pub const fn description(self) -> &'static str {
        match self {
            Self::PureHawks => "share of agents that are hawks in both roles, per population",
            Self::FoxUsage => "mean fox usage per population, with the overall trend",
            Self::FoxWeightHeatmap => "fox weight over time per regime and f, sorted by rank",
            Self::FoxWeightTable => "final fox weight by rank and f per regime (LaTeX)",
            Self::Lorenz => "Lorenz curves of final payoffs per regime",
            Self::TotalPayoffs => "total final payoff per regime",
            Self::AgentCycles => "one agent's rank, network, strategy and morality over time",
            Self::StrategyGrid => "final strategies per rank and f as ring markers",
        }
    }
}

impl fmt::Display for FigureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-figure replacement of parts of the built-in spec.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FigureOverride {
    /// Replacement title.
    #[serde(default)]
    pub title: Option<String>,
    /// Replacement size in pixels.
    #[serde(default)]
    pub size: Option<(u32, u32)>,
    /// Replacement horizontal axis.
    #[serde(default)]
    pub x: Option<AxisSpec>,
    /// Replacement vertical axis.
    #[serde(default)]
    pub y: Option<AxisSpec>,
    /// Replacement legend.
    #[serde(default)]
    pub legend: Option<LegendSpec>,
    /// Replacement palette.
    #[serde(default)]
    pub palette: Option<Palette>,
}

impl FigureOverride {
    fn apply(&self, mut spec: FigureSpec) -> FigureSpec {
        if let Some(title) = &self.title {
            spec.title.clone_from(title);
        }
        if let Some(size) = self.size {
            spec.size = size;
        }
        if let Some(x) = &self.x {
            spec.x = x.clone();
        }
        if let Some(y) = &self.y {
            spec.y = y.clone();
        }
        if let Some(legend) = self.legend {
            spec.legend = legend;
        }
        if let Some(palette) = &self.palette {
            spec.palette = palette.clone();
        }
        spec
    }
}

/// Resolved figure specs, built-in defaults with overrides applied.
#[derive(Debug, Clone)]
pub struct FigureCatalog {
    specs: BTreeMap<FigureKind, FigureSpec>,
}

impl FigureCatalog {
    /// Resolve every kind's spec against `overrides`.
    pub fn new(overrides: &BTreeMap<FigureKind, FigureOverride>) -> Self {
        let specs = FigureKind::ALL
            .into_iter()
            .map(|kind| {
                let spec = default_spec(kind);
                let spec = match overrides.get(&kind) {
                    Some(patch) => patch.apply(spec),
                    None => spec,
                };
                (kind, spec)
            })
            .collect();
        Self { specs }
    }

    /// The resolved spec of `kind`.
    pub fn spec(&self, kind: FigureKind) -> FigureSpec {
        self.specs.get(&kind).cloned().unwrap_or_default()
    }
}

/// Ring colours: hawk, not hawk, fox.
fn ring_palette() -> Palette {
    Palette::new(vec![
        Rgb(0x70, 0x52, 0x59),
        Rgb(0x16, 0x7D, 0x9C),
        Rgb(0xEF, 0xA0, 0x7D),
    ])
}

fn percent_ticks() -> Vec<Tick> {
    [0_u8, 25, 50, 75, 100]
        .into_iter()
        .map(|p| Tick::new(f64::from(p), p.to_string()))
        .collect()
}

/// Built-in styling of `kind`.
pub fn default_spec(kind: FigureKind) -> FigureSpec {
    match kind {
        FigureKind::PureHawks => FigureSpec {
            x: AxisSpec::labelled("Proportion of pure hawks (%)"),
            y: AxisSpec::labelled("f").with_range(-0.1, 1.1),
            palette: Palette::populations(),
            ..FigureSpec::titled("Pure Hawks Across Populations")
        },
        FigureKind::FoxUsage => FigureSpec {
            size: (1200, 700),
            x: AxisSpec::labelled("Power Asymmetry f"),
            y: AxisSpec::labelled("Proportion of Foxes in Population"),
            palette: Palette::populations(),
            ..FigureSpec::titled("Power Asymmetry vs. Proportion of Foxes (by Population Size)")
        },
        FigureKind::FoxWeightHeatmap => FigureSpec {
            size: (1600, 800),
            x: AxisSpec::labelled("Time Step"),
            y: AxisSpec::labelled("Agents"),
            legend: LegendSpec::HIDDEN,
            ..FigureSpec::titled("Fox Strategy Weight Over Time (Sorted by Final Rank)")
        },
        FigureKind::FoxWeightTable => FigureSpec::default(),
        FigureKind::Lorenz => FigureSpec {
            size: (600, 600),
            x: AxisSpec::labelled("Cumulative Population (%)")
                .with_range(0.0, 100.0)
                .with_ticks(percent_ticks()),
            y: AxisSpec {
                position: AxisPosition::Right,
                ..AxisSpec::labelled("Cumulative Wealth (%)")
                    .with_range(0.0, 100.0)
                    .with_ticks(percent_ticks())
            },
            legend: LegendSpec {
                show: true,
                position: LegendPosition::UpperLeft,
            },
            ..FigureSpec::titled("Lorenz Curve")
        },
        FigureKind::TotalPayoffs => FigureSpec {
            y: AxisSpec::labelled("Total Payoff"),
            legend: LegendSpec::HIDDEN,
            ..FigureSpec::titled("Total Payoffs")
        },
        FigureKind::AgentCycles => FigureSpec {
            size: (1200, 600),
            x: AxisSpec::labelled("Time"),
            y: AxisSpec::default()
                .with_range(-0.05, 1.05)
                .with_ticks(vec![Tick::new(0.0, "Minimum"), Tick::new(1.0, "Maximum")]),
            legend: LegendSpec {
                show: true,
                position: LegendPosition::CenterRight,
            },
            palette: Palette::cycles(),
            ..FigureSpec::default()
        },
        FigureKind::StrategyGrid => FigureSpec {
            x: AxisSpec::labelled("Rank"),
            y: AxisSpec::labelled("f"),
            legend: LegendSpec::HIDDEN,
            palette: ring_palette(),
            ..FigureSpec::default()
        },
    }
}
