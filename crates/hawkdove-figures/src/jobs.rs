//! One job per [`FigureKind`]: run the study, draw it, write the sidecar.
//!
//! Output lands under `<output root>/<group>/`, where the group is the
//! population directory for population sweeps, the regime directory for
//! regime sweeps, and `payoffs` for the cross-regime payoff figures. Every
//! image is accompanied by a `.json` file holding the data it was drawn
//! from.

use std::fs;
use std::path::{Path, PathBuf};

use hawkdove_analysis::studies::cycles::{CycleParams, agent_cycles};
use hawkdove_analysis::studies::fox_usage::{FoxUsageParams, fox_usage};
use hawkdove_analysis::studies::fox_weight::{fox_weight_heatmap, fox_weight_table};
use hawkdove_analysis::studies::payoffs::{PayoffParams, lorenz_curves, total_payoffs};
use hawkdove_analysis::studies::population_key;
use hawkdove_analysis::studies::pure_hawks::{PureHawksParams, pure_hawks};
use hawkdove_analysis::studies::strategy_grid::{StrategyGrid, strategy_grid};
use hawkdove_analysis::{ComparisonDataset, RunLocator, Series};
use hawkdove_render::{
    Bar, Colormap, FigureSpec, Heatmap, LineKind, PlotSeries, RingMarker, Rgb, SeriesStyle, Tick,
    render_bars, render_heatmap, render_lines, render_ring_grid,
};
use hawkdove_types::{ConditionKey, PowerAsymmetry};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::{FigureCatalog, FigureKind};
use crate::config::FiguresConfig;
use crate::error::FigureError;

/// Directory of the cross-regime payoff figures.
const PAYOFF_DIR: &str = "payoffs";

/// Stroke of each agent cycle trace, in trace order.
const CYCLE_LINES: [LineKind; 6] = [
    LineKind::Dashed,
    LineKind::Dashed,
    LineKind::Solid,
    LineKind::Solid,
    LineKind::Dotted,
    LineKind::Dotted,
];

/// Ring rows are spaced slightly more than one unit apart.
const RING_ROW_SPACING: f64 = 1.1;

/// Everything a job reads. Shared read-only between parallel jobs.
pub struct JobContext<'a> {
    /// Resolved configuration.
    pub config: &'a FiguresConfig,
    /// Resolved figure styling.
    pub catalog: &'a FigureCatalog,
    /// Input file resolution.
    pub locator: &'a dyn RunLocator,
}

impl JobContext<'_> {
    fn image_path(&self, group: &str, stem: &str) -> PathBuf {
        self.config
            .output
            .root
            .join(group)
            .join(format!("{stem}.{}", self.config.output.format.extension()))
    }

    fn sweep(&self) -> &[PowerAsymmetry] {
        &self.config.experiment.powers
    }
}

/// Run one job and return the files it wrote.
///
/// # Errors
///
/// Returns the first analysis, render or write failure of the job.
pub fn run(kind: FigureKind, ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    debug!(figure = %kind, "figure job starting");
    let written = match kind {
        FigureKind::PureHawks => run_pure_hawks(ctx),
        FigureKind::FoxUsage => run_fox_usage(ctx),
        FigureKind::FoxWeightHeatmap => run_fox_weight_heatmap(ctx),
        FigureKind::FoxWeightTable => run_fox_weight_table(ctx),
        FigureKind::Lorenz => run_lorenz(ctx),
        FigureKind::TotalPayoffs => run_total_payoffs(ctx),
        FigureKind::AgentCycles => run_agent_cycles(ctx),
        FigureKind::StrategyGrid => run_strategy_grid(ctx),
    }?;
    for path in &written {
        info!(figure = %kind, path = %path.display(), "figure written");
    }
    Ok(written)
}

fn plot_series(series: &Series) -> PlotSeries {
    PlotSeries::new(series.label.as_str(), series.points.clone())
}

fn write_file(path: &Path, contents: &str) -> Result<(), FigureError> {
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    };
    write().map_err(|source| FigureError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `data` as pretty JSON next to `image`.
fn write_sidecar(image: &Path, data: &impl Serialize) -> Result<PathBuf, FigureError> {
    let path = image.with_extension("json");
    write_file(&path, &serde_json::to_string_pretty(data)?)?;
    Ok(path)
}

fn write_dataset_sidecar(image: &Path, dataset: &ComparisonDataset) -> Result<PathBuf, FigureError> {
    let path = image.with_extension("json");
    write_file(&path, &dataset.to_json()?)?;
    Ok(path)
}

fn run_pure_hawks(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let experiment = &ctx.config.experiment;
    let dataset = pure_hawks(
        ctx.locator,
        &PureHawksParams {
            populations: experiment.populations.clone(),
            sweep: ctx.sweep().to_vec(),
            cutoff: ctx.config.analysis.pure_hawk_cutoff,
        },
    )?;
    let series: Vec<PlotSeries> = experiment
        .populations
        .iter()
        .filter_map(|&n| dataset.get(&population_key(n)))
        .flatten()
        .map(plot_series)
        .collect();

    let image = ctx.image_path(&experiment.population_dir, "pure_hawks");
    render_lines(&image, &ctx.catalog.spec(FigureKind::PureHawks), &series)?;
    let sidecar = write_dataset_sidecar(&image, &dataset)?;
    Ok(vec![image, sidecar])
}

fn run_fox_usage(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let experiment = &ctx.config.experiment;
    let dataset = fox_usage(
        ctx.locator,
        &FoxUsageParams {
            populations: experiment.populations.clone(),
            sweep: ctx.sweep().to_vec(),
            scale: ctx.config.analysis.fox_usage_scale,
        },
    )?;
    let trend_style = SeriesStyle::colored(Rgb::BLACK).with_line(LineKind::Dashed);
    let series: Vec<PlotSeries> = experiment
        .populations
        .iter()
        .filter_map(|&n| dataset.get(&population_key(n)))
        .flatten()
        .map(plot_series)
        .chain(
            dataset
                .summary()
                .iter()
                .map(|s| plot_series(s).with_style(trend_style)),
        )
        .collect();

    let image = ctx.image_path(&experiment.population_dir, "fox_usage");
    render_lines(&image, &ctx.catalog.spec(FigureKind::FoxUsage), &series)?;
    let sidecar = write_dataset_sidecar(&image, &dataset)?;
    Ok(vec![image, sidecar])
}

#[allow(clippy::cast_precision_loss)]
fn run_fox_weight_heatmap(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let base = ctx.catalog.spec(FigureKind::FoxWeightHeatmap);
    let colormap = Colormap::magma_r();
    let mut written = Vec::new();
    for &regime in &ctx.config.experiment.regimes {
        for &power in ctx.sweep() {
            let condition = ConditionKey::for_regime(regime, power);
            let heatmap = fox_weight_heatmap(
                ctx.locator,
                &condition,
                ctx.config.analysis.heatmap_max_columns,
            )?;
            let spec = FigureSpec {
                title: format!("{}, f = {power}", base.title),
                ..base.clone()
            };
            let cells = Heatmap {
                rows: heatmap.rows.clone(),
                domain: (0.0, 1.0),
                x_extent: (0.0, heatmap.time_steps as f64),
                colorbar_label: Some("Fox Strategy Weight".to_owned()),
            };

            let image = ctx.image_path(regime.dir_name(), &format!("fox_weight_{power}"));
            render_heatmap(&image, &spec, &cells, &colormap)?;
            let sidecar = write_sidecar(&image, &heatmap)?;
            written.extend([image, sidecar]);
        }
    }
    Ok(written)
}

fn run_fox_weight_table(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let mut written = Vec::new();
    for &regime in &ctx.config.experiment.regimes {
        let table = fox_weight_table(ctx.locator, regime, ctx.sweep())?;
        let latex = table.to_latex(&ctx.config.output.table)?;

        let path = ctx
            .config
            .output
            .root
            .join(regime.dir_name())
            .join("fox_weight_table.txt");
        write_file(&path, &latex)?;
        let sidecar = write_sidecar(&path, &table)?;
        written.extend([path, sidecar]);
    }
    Ok(written)
}

fn payoff_params(ctx: &JobContext<'_>) -> PayoffParams {
    PayoffParams {
        regimes: ctx.config.experiment.regimes.clone(),
        power: ctx.config.analysis.payoff_power,
        agents: ctx.config.analysis.payoff_agents,
    }
}

fn run_lorenz(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let params = payoff_params(ctx);
    let dataset = lorenz_curves(ctx.locator, &params)?;
    let series: Vec<PlotSeries> = params
        .regimes
        .iter()
        .filter_map(|&regime| dataset.get(&ConditionKey::for_regime(regime, params.power)))
        .flatten()
        .map(plot_series)
        .collect();

    let image = ctx.image_path(PAYOFF_DIR, "lorenz");
    render_lines(&image, &ctx.catalog.spec(FigureKind::Lorenz), &series)?;
    let sidecar = write_dataset_sidecar(&image, &dataset)?;
    Ok(vec![image, sidecar])
}

fn run_total_payoffs(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let params = payoff_params(ctx);
    let dataset = total_payoffs(ctx.locator, &params)?;
    let bars: Vec<Bar> = params
        .regimes
        .iter()
        .filter_map(|&regime| {
            let series = dataset.get(&ConditionKey::for_regime(regime, params.power))?;
            let (_, total) = series.first()?.points.first().copied()?;
            Some(Bar {
                label: regime.dir_name().to_owned(),
                value: total,
                color: None,
            })
        })
        .collect();

    let image = ctx.image_path(PAYOFF_DIR, "total_payoffs");
    render_bars(&image, &ctx.catalog.spec(FigureKind::TotalPayoffs), &bars)?;
    let sidecar = write_dataset_sidecar(&image, &dataset)?;
    Ok(vec![image, sidecar])
}

fn run_agent_cycles(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let cycle = ctx.config.analysis.cycle;
    let condition = cycle.condition();
    let dataset = agent_cycles(
        ctx.locator,
        &CycleParams {
            condition,
            agent: cycle.agent,
            window: cycle.window,
            policy: ctx.config.analysis.degenerate_policy,
        },
    )?;
    let series: Vec<PlotSeries> = dataset
        .get(&condition)
        .unwrap_or_default()
        .iter()
        .zip(CYCLE_LINES)
        .map(|(series, line)| {
            plot_series(series).with_style(SeriesStyle {
                line,
                ..SeriesStyle::default()
            })
        })
        .collect();

    let mut spec = ctx.catalog.spec(FigureKind::AgentCycles);
    if spec.title.is_empty() {
        spec.title = dataset.title().to_owned();
    }
    let group = condition.regime.map_or(
        ctx.config.experiment.population_dir.as_str(),
        |regime| regime.dir_name(),
    );
    let stem = format!("agent_{}_cycles_{}", cycle.agent, cycle.power.dir_name());
    let image = ctx.image_path(group, &stem);
    render_lines(&image, &spec, &series)?;
    let sidecar = write_dataset_sidecar(&image, &dataset)?;
    Ok(vec![image, sidecar])
}

fn run_strategy_grid(ctx: &JobContext<'_>) -> Result<Vec<PathBuf>, FigureError> {
    let base = ctx.catalog.spec(FigureKind::StrategyGrid);
    let mut written = Vec::new();
    for &regime in &ctx.config.experiment.regimes {
        let grid = strategy_grid(ctx.locator, regime, ctx.sweep())?;
        let clamped = grid
            .points
            .iter()
            .filter(|p| !(0.0..=1.0).contains(&p.fox))
            .count();
        if clamped > 0 {
            warn!(%regime, clamped, "fox weights outside [0, 1] clamped for display");
        }
        let spec = grid_spec(&base, &grid, ctx.sweep());
        let markers = ring_markers(&grid, ctx.sweep(), &spec, ctx.config.analysis.hawk_display_cutoff);

        let image = ctx.image_path(regime.dir_name(), "strategy_grid");
        render_ring_grid(&image, &spec, &markers)?;
        let sidecar = write_dataset_sidecar(&image, &grid.to_dataset())?;
        written.extend([image, sidecar]);
    }
    Ok(written)
}

/// Fill in the regime title and the rank and `f` ticks the base spec leaves
/// open.
#[allow(clippy::cast_precision_loss)]
fn grid_spec(base: &FigureSpec, grid: &StrategyGrid, sweep: &[PowerAsymmetry]) -> FigureSpec {
    let mut spec = base.clone();
    if spec.title.is_empty() {
        spec.title = grid.regime.dir_name().to_owned();
    }
    if spec.x.ticks.is_empty() {
        let agents = grid.points.len().checked_div(sweep.len()).unwrap_or(0);
        spec.x.ticks = (1..=agents)
            .map(|rank| Tick::new(rank as f64, rank.to_string()))
            .collect();
    }
    if spec.y.ticks.is_empty() {
        spec.y.ticks = sweep
            .iter()
            .enumerate()
            .map(|(row, f)| Tick::new(RING_ROW_SPACING * row as f64, f.to_string()))
            .collect();
    }
    spec
}

/// One marker per agent and `f`: hawk-coloured rings above `cutoff`, fox dot
/// opacity from the fox weight. Colours are the palette's first three
/// entries: hawk, not hawk, fox.
#[allow(clippy::cast_precision_loss)]
fn ring_markers(
    grid: &StrategyGrid,
    sweep: &[PowerAsymmetry],
    spec: &FigureSpec,
    cutoff: f64,
) -> Vec<RingMarker> {
    let (hawk, other, fox) = (spec.palette.color(0), spec.palette.color(1), spec.palette.color(2));
    let ring = |weight: f64| if weight > cutoff { hawk } else { other };
    grid.points
        .iter()
        .filter_map(|point| {
            let row = sweep.iter().position(|f| *f == point.power)?;
            Some(RingMarker {
                x: point.rank,
                y: RING_ROW_SPACING * row as f64,
                outer: ring(point.visit_hawk),
                inner: ring(point.host_hawk),
                dot: fox,
                dot_alpha: point.fox.clamp(0.0, 1.0),
            })
        })
        .collect()
}
