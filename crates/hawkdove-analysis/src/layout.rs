//! Where a condition's input tables live on disk.
//!
//! Scripts used to hardcode these paths; here a [`RunLocator`] is handed to
//! every study instead. Two layouts exist:
//!
//! - [`IndexedLayout`]: one directory per condition,
//!   `<root>/<condition dir>/<Metric>_<run>.csv`.
//! - [`KeyedLayout`]: a flat directory of
//!   `<prefix><Metric>_<KEY>_<params>.csv` files, where the run key for each
//!   (population or regime, `f`) pair is listed explicitly.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry, Regime, RunFile};

use crate::error::{AnalysisError, Result};
use crate::table::{LoadOptions, RunTable};

/// Resolves the input file of one metric under one condition.
pub trait RunLocator: Send + Sync {
    /// Path of `metric`'s table for `condition`.
    ///
    /// The file is not required to exist; loading reports absence.
    fn locate(&self, condition: &ConditionKey, metric: Metric) -> Result<PathBuf>;

    /// Whether tables carry a header line.
    fn headers(&self) -> bool;

    /// Locate and load a table, validating its stride and agent count.
    ///
    /// Failures are qualified with `condition`.
    fn load(
        &self,
        condition: &ConditionKey,
        metric: Metric,
        agents: Option<usize>,
    ) -> Result<RunTable> {
        let path = self
            .locate(condition, metric)
            .map_err(|e| e.in_condition(*condition))?;
        let options = LoadOptions::for_metric(self.headers(), metric, agents);
        RunTable::load(&path, &options).map_err(|e| e.in_condition(*condition))
    }
}

/// One directory per condition, indexed run files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedLayout {
    root: PathBuf,
    population_dir: String,
    run: u32,
    headers: bool,
}

impl IndexedLayout {
    /// Create a layout rooted at `root`.
    ///
    /// `population_dir` names the directory that groups population sweeps
    /// (`population` in the standard output tree); `run` selects
    /// `<Metric>_<run>.csv` within each condition directory.
    pub fn new(root: impl Into<PathBuf>, population_dir: &str, run: u32, headers: bool) -> Self {
        Self {
            root: root.into(),
            population_dir: population_dir.to_owned(),
            run,
            headers,
        }
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl RunLocator for IndexedLayout {
    fn locate(&self, condition: &ConditionKey, metric: Metric) -> Result<PathBuf> {
        Ok(self
            .root
            .join(condition.relative_dir(&self.population_dir))
            .join(RunFile::indexed(metric, self.run).file_name()))
    }

    fn headers(&self) -> bool {
        self.headers
    }
}

/// Flat directory of keyed run files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedLayout {
    root: PathBuf,
    prefix: String,
    params: Vec<String>,
    sweep: Vec<PowerAsymmetry>,
    population_keys: BTreeMap<u32, Vec<String>>,
    regime_keys: BTreeMap<Regime, Vec<String>>,
    headers: bool,
}

impl KeyedLayout {
    /// Create a keyed layout.
    ///
    /// Each key list is indexed by position in `sweep`: the key at index
    /// `i` is the run for `sweep[i]`.
    pub fn new(
        root: impl Into<PathBuf>,
        prefix: &str,
        params: Vec<String>,
        sweep: Vec<PowerAsymmetry>,
        headers: bool,
    ) -> Self {
        Self {
            root: root.into(),
            prefix: prefix.to_owned(),
            params,
            sweep,
            population_keys: BTreeMap::new(),
            regime_keys: BTreeMap::new(),
            headers,
        }
    }

    /// Register the run keys of a population sweep.
    #[must_use]
    pub fn with_population_keys(mut self, population: u32, keys: Vec<String>) -> Self {
        self.population_keys.insert(population, keys);
        self
    }

    /// Register the run keys of a regime sweep.
    #[must_use]
    pub fn with_regime_keys(mut self, regime: Regime, keys: Vec<String>) -> Self {
        self.regime_keys.insert(regime, keys);
        self
    }

    fn run_key(&self, condition: &ConditionKey) -> Result<&str> {
        let unmapped = |reason: String| AnalysisError::UnmappedCondition {
            condition: *condition,
            reason,
        };

        let power = condition
            .power
            .ok_or_else(|| unmapped("keyed layout needs a power asymmetry".to_owned()))?;
        let index = self
            .sweep
            .iter()
            .position(|f| *f == power)
            .ok_or_else(|| unmapped(format!("f={power} is not in the configured sweep")))?;

        let keys = if let Some(population) = condition.population {
            self.population_keys
                .get(&population)
                .ok_or_else(|| unmapped(format!("no run keys for population {population}")))?
        } else if let Some(regime) = condition.regime {
            self.regime_keys
                .get(&regime)
                .ok_or_else(|| unmapped(format!("no run keys for regime {regime}")))?
        } else {
            return Err(unmapped(
                "keyed layout needs a population or a regime".to_owned(),
            ));
        };

        keys.get(index)
            .map(String::as_str)
            .ok_or_else(|| unmapped(format!("only {} run keys listed", keys.len())))
    }
}

impl RunLocator for KeyedLayout {
    fn locate(&self, condition: &ConditionKey, metric: Metric) -> Result<PathBuf> {
        let key = self.run_key(condition)?;
        let file = RunFile::keyed(&self.prefix, metric, key, &self.params);
        Ok(self.root.join(file.file_name()))
    }

    fn headers(&self) -> bool {
        self.headers
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hawkdove_types::{NetworkRegime, RankRegime};

    use super::*;

    #[test]
    fn indexed_paths_follow_condition_dirs() {
        let layout = IndexedLayout::new("/data/Output", "population", 0, false);
        let f = PowerAsymmetry::from_milli(400);
        let regime = Regime::new(RankRegime::Dynamic, NetworkRegime::Dynamic);

        let path = layout
            .locate(&ConditionKey::for_regime(regime, f), Metric::NetStd)
            .unwrap();
        assert_eq!(
            path,
            Path::new("/data/Output/dynamicrank_dynamicnet/ff_0.4/NetSTD_0.csv")
        );

        let path = layout
            .locate(&ConditionKey::for_population(200, f), Metric::FoxUsage)
            .unwrap();
        assert_eq!(
            path,
            Path::new("/data/Output/population/200/ff_0.4/FoxUsage_0.csv")
        );
    }

    #[test]
    fn keyed_paths_pick_key_by_sweep_position() {
        let sweep = vec![PowerAsymmetry::from_milli(0), PowerAsymmetry::from_milli(100)];
        let layout = KeyedLayout::new(
            "/data",
            "HDInnov_",
            vec!["1".to_owned(), "7".to_owned()],
            sweep,
            false,
        )
        .with_population_keys(20, vec!["2A441A0Y".to_owned(), "R0Y7V4G8".to_owned()]);

        let key = ConditionKey::for_population(20, PowerAsymmetry::from_milli(100));
        let path = layout.locate(&key, Metric::StrategyVisit).unwrap();
        assert_eq!(
            path,
            Path::new("/data/HDInnov_StrategyVisit_R0Y7V4G8_1_7.csv")
        );
    }

    #[test]
    fn keyed_layout_reports_unmapped_conditions() {
        let layout = KeyedLayout::new(
            "/data",
            "HDInnov_",
            Vec::new(),
            vec![PowerAsymmetry::from_milli(0)],
            false,
        );

        let unknown_population = ConditionKey::for_population(50, PowerAsymmetry::from_milli(0));
        assert!(matches!(
            layout.locate(&unknown_population, Metric::FoxUsage),
            Err(AnalysisError::UnmappedCondition { .. })
        ));

        let off_sweep = ConditionKey::for_population(50, PowerAsymmetry::from_milli(500));
        let err = layout.locate(&off_sweep, Metric::FoxUsage).unwrap_err();
        assert!(err.to_string().contains("not in the configured sweep"), "{err}");
    }

    #[test]
    fn load_qualifies_missing_files_with_condition() {
        let dir = tempfile::tempdir().unwrap();
        let layout = IndexedLayout::new(dir.path(), "population", 0, false);
        let key = ConditionKey::for_population(20, PowerAsymmetry::from_milli(300));
        let err = layout.load(&key, Metric::FoxUsage, None).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("population=20 f=0.3"), "{message}");
        assert!(message.contains("FoxUsage_0.csv"), "{message}");
    }
}
