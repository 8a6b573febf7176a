//! Configuration for the figure generator.
//!
//! Values are layered: built-in defaults, then an optional YAML or TOML
//! file, then environment variables prefixed `HAWKDOVE__` with `__` between
//! path segments (`HAWKDOVE__ANALYSIS__PURE_HAWK_CUTOFF=0.95`). List values
//! read from the environment are comma separated.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hawkdove_analysis::studies::cycles::TimeWindow;
use hawkdove_analysis::{DegeneratePolicy, IndexedLayout, KeyedLayout, RunLocator, TableOptions};
use hawkdove_types::{ConditionKey, NetworkRegime, PowerAsymmetry, RankRegime, Regime};
use serde::Deserialize;

use crate::catalog::{FigureKind, FigureOverride};
use crate::error::FigureError;

/// Config file read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "hawkdove-figures.yaml";

/// Environment variable prefix.
const ENV_PREFIX: &str = "HAWKDOVE";

/// Keys whose environment values are comma-separated lists.
const ENV_LIST_KEYS: [&str; 3] = [
    "experiment.populations",
    "experiment.powers",
    "experiment.regimes",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiguresConfig {
    /// Where simulation output is read from.
    #[serde(default)]
    pub input: InputConfig,
    /// Where figures are written.
    #[serde(default)]
    pub output: OutputConfig,
    /// The experiment grid: populations, regimes and `f` values.
    #[serde(default)]
    pub experiment: ExperimentConfig,
    /// Thresholds and study parameters.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Log filter and format.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Styling overrides per figure kind.
    #[serde(default)]
    pub figures: BTreeMap<FigureKind, FigureOverride>,
}

impl FiguresConfig {
    /// Load from defaults, `path` (or [`DEFAULT_CONFIG_FILE`] when present)
    /// and the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly named file is missing, or if any
    /// layer fails to parse into the schema.
    pub fn load(path: Option<&Path>) -> Result<Self, FigureError> {
        Self::load_with_env(path, None)
    }

    /// Like [`FiguresConfig::load`], reading environment variables from
    /// `env` instead of the process when it is given.
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, FigureError> {
        let file = match path {
            Some(path) => config::File::from(path.to_path_buf()).required(true),
            None => config::File::from(PathBuf::from(DEFAULT_CONFIG_FILE)).required(false),
        };
        let environment = ENV_LIST_KEYS.into_iter().fold(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .source(env),
            config::Environment::with_list_parse_key,
        );

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), FigureError> {
        let invalid = |key: &str, reason: &str| FigureError::InvalidConfig {
            key: key.to_owned(),
            reason: reason.to_owned(),
        };
        let unit = |v: f64| (0.0..=1.0).contains(&v);
        if !unit(self.analysis.pure_hawk_cutoff) {
            return Err(invalid("analysis.pure_hawk_cutoff", "must be within [0, 1]"));
        }
        if !unit(self.analysis.hawk_display_cutoff) {
            return Err(invalid("analysis.hawk_display_cutoff", "must be within [0, 1]"));
        }
        if !(self.analysis.fox_usage_scale.is_finite() && self.analysis.fox_usage_scale > 0.0) {
            return Err(invalid("analysis.fox_usage_scale", "must be positive"));
        }
        if self.analysis.heatmap_max_columns == 0 {
            return Err(invalid("analysis.heatmap_max_columns", "must be at least 1"));
        }
        if self.experiment.powers.is_empty() {
            return Err(invalid("experiment.powers", "needs at least one value"));
        }
        if self
            .analysis
            .cycle
            .window
            .is_some_and(|window| window.start > window.end)
        {
            return Err(invalid("analysis.cycle.window", "start is after end"));
        }
        Ok(())
    }
}

/// Input tree layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutKind {
    /// `<root>/<condition dir>/<Metric>_<run>.csv`.
    #[default]
    Indexed,
    /// `<root>/<prefix><Metric>_<KEY>_<params>.csv` with listed run keys.
    Keyed,
}

/// Where simulation output is read from.
#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    /// Root of the simulation output tree.
    #[serde(default = "default_input_root")]
    pub root: PathBuf,
    /// Whether every table starts with a header line.
    #[serde(default)]
    pub headers: bool,
    /// File naming scheme under `root`.
    #[serde(default)]
    pub layout: LayoutKind,
    /// Run keys for the keyed layout.
    #[serde(default)]
    pub keyed: KeyedConfig,
}

fn default_input_root() -> PathBuf {
    PathBuf::from("Output")
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            root: default_input_root(),
            headers: false,
            layout: LayoutKind::default(),
            keyed: KeyedConfig::default(),
        }
    }
}

impl InputConfig {
    /// Build the locator described by this section.
    ///
    /// # Errors
    ///
    /// Returns [`FigureError::InvalidConfig`] when a keyed population is not
    /// a number.
    pub fn locator(&self, experiment: &ExperimentConfig) -> Result<Box<dyn RunLocator>, FigureError> {
        match self.layout {
            LayoutKind::Indexed => Ok(Box::new(IndexedLayout::new(
                &self.root,
                &experiment.population_dir,
                experiment.run,
                self.headers,
            ))),
            LayoutKind::Keyed => {
                let mut layout = KeyedLayout::new(
                    &self.root,
                    &self.keyed.prefix,
                    self.keyed.params.clone(),
                    experiment.powers.clone(),
                    self.headers,
                );
                for (population, keys) in &self.keyed.populations {
                    let population = population.parse::<u32>().map_err(|e| FigureError::InvalidConfig {
                        key: format!("input.keyed.populations.{population}"),
                        reason: e.to_string(),
                    })?;
                    layout = layout.with_population_keys(population, keys.clone());
                }
                for (regime, keys) in &self.keyed.regimes {
                    layout = layout.with_regime_keys(*regime, keys.clone());
                }
                Ok(Box::new(layout))
            }
        }
    }
}

/// Run keys of the keyed layout, one list per sweep in `experiment.powers`
/// order.
#[derive(Debug, Clone, Deserialize)]
pub struct KeyedConfig {
    /// File name prefix, e.g. `HDInnov_`.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Trailing parameter segments, e.g. `["1", "7"]`.
    #[serde(default = "default_params")]
    pub params: Vec<String>,
    /// Run keys per population size.
    #[serde(default)]
    pub populations: BTreeMap<String, Vec<String>>,
    /// Run keys per regime.
    #[serde(default)]
    pub regimes: BTreeMap<Regime, Vec<String>>,
}

fn default_prefix() -> String {
    "HDInnov_".to_owned()
}

fn default_params() -> Vec<String> {
    vec!["1".to_owned(), "7".to_owned()]
}

impl Default for KeyedConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            params: default_params(),
            populations: BTreeMap::new(),
            regimes: BTreeMap::new(),
        }
    }
}

/// Image format of written figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Scalable vector graphics.
    #[default]
    Svg,
    /// Raster; needs the `bitmap` feature.
    Png,
}

impl OutputFormat {
    /// File extension without the dot.
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
        }
    }
}

/// Where figures are written.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Root directory; each figure goes in a sub-directory of it.
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
    /// Image format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Caption, label and alignment of exported LaTeX tables.
    #[serde(default)]
    pub table: TableOptions,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("Figures")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            format: OutputFormat::default(),
            table: TableOptions::default(),
        }
    }
}

/// The experiment grid.
#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Population sizes of the population sweeps.
    #[serde(default = "default_populations")]
    pub populations: Vec<u32>,
    /// Power asymmetry values, in sweep order.
    #[serde(default = "PowerAsymmetry::standard_sweep")]
    pub powers: Vec<PowerAsymmetry>,
    /// Regimes compared, in drawing order.
    #[serde(default = "default_regimes")]
    pub regimes: Vec<Regime>,
    /// Directory grouping the population sweeps.
    #[serde(default = "default_population_dir")]
    pub population_dir: String,
    /// Run index of indexed file names.
    #[serde(default)]
    pub run: u32,
}

fn default_populations() -> Vec<u32> {
    vec![20, 50, 100, 200, 500]
}

fn default_regimes() -> Vec<Regime> {
    Regime::ALL.to_vec()
}

fn default_population_dir() -> String {
    "population".to_owned()
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            populations: default_populations(),
            powers: PowerAsymmetry::standard_sweep(),
            regimes: default_regimes(),
            population_dir: default_population_dir(),
            run: 0,
        }
    }
}

/// Thresholds and study parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Hawk weight an agent must exceed in both roles to count as a pure
    /// hawk.
    #[serde(default = "default_pure_hawk_cutoff")]
    pub pure_hawk_cutoff: f64,
    /// Hawk weight above which a ring is drawn in the hawk colour.
    #[serde(default = "default_hawk_display_cutoff")]
    pub hawk_display_cutoff: f64,
    /// Divisor turning raw fox usage counts into a proportion.
    #[serde(default = "default_fox_usage_scale")]
    pub fox_usage_scale: f64,
    /// Handling of constant series during normalisation.
    #[serde(default)]
    pub degenerate_policy: DegeneratePolicy,
    /// The `f` payoff figures compare regimes at.
    #[serde(default = "default_payoff_power")]
    pub payoff_power: PowerAsymmetry,
    /// Expected agent count of payoff tables, checked when set.
    #[serde(default)]
    pub payoff_agents: Option<usize>,
    /// Longest time axis drawn in a heatmap before bin-averaging.
    #[serde(default = "default_heatmap_max_columns")]
    pub heatmap_max_columns: usize,
    /// The agent cycle figure.
    #[serde(default)]
    pub cycle: CycleConfig,
}

const fn default_pure_hawk_cutoff() -> f64 {
    0.9
}

const fn default_hawk_display_cutoff() -> f64 {
    0.8
}

const fn default_fox_usage_scale() -> f64 {
    100_000.0
}

const fn default_payoff_power() -> PowerAsymmetry {
    PowerAsymmetry::from_milli(600)
}

const fn default_heatmap_max_columns() -> usize {
    2000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            pure_hawk_cutoff: default_pure_hawk_cutoff(),
            hawk_display_cutoff: default_hawk_display_cutoff(),
            fox_usage_scale: default_fox_usage_scale(),
            degenerate_policy: DegeneratePolicy::default(),
            payoff_power: default_payoff_power(),
            payoff_agents: None,
            heatmap_max_columns: default_heatmap_max_columns(),
            cycle: CycleConfig::default(),
        }
    }
}

/// Which run and agent the cycle figure follows.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CycleConfig {
    /// Regime of the run, when it is part of a regime sweep.
    #[serde(default = "default_cycle_regime")]
    pub regime: Regime,
    /// Population of the run; takes precedence over `regime` when set.
    #[serde(default)]
    pub population: Option<u32>,
    /// `f` of the run.
    #[serde(default = "default_cycle_power")]
    pub power: PowerAsymmetry,
    /// Zero-based agent index.
    #[serde(default = "default_cycle_agent")]
    pub agent: usize,
    /// Steps drawn, 1-based and inclusive. All when absent.
    #[serde(default)]
    pub window: Option<TimeWindow>,
}

const fn default_cycle_regime() -> Regime {
    Regime::new(RankRegime::Dynamic, NetworkRegime::Dynamic)
}

const fn default_cycle_power() -> PowerAsymmetry {
    PowerAsymmetry::from_milli(400)
}

const fn default_cycle_agent() -> usize {
    6
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            regime: default_cycle_regime(),
            population: None,
            power: default_cycle_power(),
            agent: default_cycle_agent(),
            window: None,
        }
    }
}

impl CycleConfig {
    /// The condition whose run is read.
    pub const fn condition(&self) -> ConditionKey {
        match self.population {
            Some(population) => ConditionKey::for_population(population, self.power),
            None => ConditionKey::for_regime(self.regime, self.power),
        }
    }
}

/// Log output.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive; `RUST_LOG` wins when set.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Line format.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_owned()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One JSON object per event.
    Json,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::fs;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> Option<config::Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
                .collect(),
        )
    }

    #[test]
    fn defaults_without_file_or_env() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(DEFAULT_CONFIG_FILE);
        assert!(FiguresConfig::load_with_env(Some(&missing), env(&[])).is_err());

        let config = FiguresConfig::load_with_env(None, env(&[])).unwrap();
        assert_eq!(config.analysis.pure_hawk_cutoff, 0.9);
        assert_eq!(config.analysis.hawk_display_cutoff, 0.8);
        assert_eq!(config.analysis.payoff_power, PowerAsymmetry::from_milli(600));
        assert_eq!(config.experiment.populations, vec![20, 50, 100, 200, 500]);
        assert_eq!(config.experiment.powers.len(), 11);
        assert_eq!(config.experiment.regimes, Regime::ALL.to_vec());
        assert_eq!(config.output.format, OutputFormat::Svg);
        assert_eq!(config.input.layout, LayoutKind::Indexed);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_then_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures.yaml");
        fs::write(
            &path,
            "input:\n  root: runs\n  layout: keyed\n  keyed:\n    populations:\n      \"20\": [A, B]\n\
             analysis:\n  pure_hawk_cutoff: 0.85\n  cycle:\n    agent: 3\n    window: { start: 10, end: 20 }\n\
             figures:\n  lorenz:\n    title: Inequality\n",
        )
        .unwrap();

        let config = FiguresConfig::load_with_env(
            Some(&path),
            env(&[
                ("HAWKDOVE__ANALYSIS__PURE_HAWK_CUTOFF", "0.95"),
                ("HAWKDOVE__EXPERIMENT__POPULATIONS", "20,50"),
                ("HAWKDOVE__LOGGING__LEVEL", "debug"),
            ]),
        )
        .unwrap();

        assert_eq!(config.input.root, PathBuf::from("runs"));
        assert_eq!(config.input.layout, LayoutKind::Keyed);
        assert_eq!(config.analysis.pure_hawk_cutoff, 0.95);
        assert_eq!(config.analysis.cycle.agent, 3);
        assert_eq!(config.analysis.cycle.window, Some(TimeWindow { start: 10, end: 20 }));
        assert_eq!(config.experiment.populations, vec![20, 50]);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(
            config.figures.get(&FigureKind::Lorenz).and_then(|o| o.title.as_deref()),
            Some("Inequality")
        );
        assert!(config.input.locator(&config.experiment).is_ok());
    }

    #[test]
    fn out_of_range_cutoff_is_rejected() {
        let err = FiguresConfig::load_with_env(
            None,
            env(&[("HAWKDOVE__ANALYSIS__PURE_HAWK_CUTOFF", "1.5")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains("analysis.pure_hawk_cutoff"), "{err}");
    }

    #[test]
    fn cycle_population_takes_precedence() {
        let cycle = CycleConfig {
            population: Some(20),
            ..CycleConfig::default()
        };
        assert_eq!(cycle.condition().population, Some(20));
        assert_eq!(cycle.condition().regime, None);
        assert_eq!(CycleConfig::default().condition().regime, Some(Regime::ALL[2]));
    }

    #[test]
    fn non_numeric_population_key_is_rejected() {
        let mut config = FiguresConfig::default();
        config.input.layout = LayoutKind::Keyed;
        config
            .input
            .keyed
            .populations
            .insert("twenty".to_owned(), vec!["A".to_owned()]);
        let err = config.input.locator(&config.experiment).err().unwrap();
        assert!(matches!(err, FigureError::InvalidConfig { .. }));
    }
}
