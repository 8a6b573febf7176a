//! One agent's trajectory through a run.
//!
//! Rank, in-strength and fox usage are min-max normalised so they share the
//! unit axis with the (clamped) hawk weights; morality is drawn raw.

use hawkdove_types::{ConditionKey, Metric};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{ComparisonDataset, Series};
use crate::error::{AnalysisError, Result};
use crate::layout::RunLocator;
use crate::normalize::{DegeneratePolicy, clamp_unit, minmax_normalize};
use crate::reshape::agent_series;

/// Inclusive range of 1-based time steps to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First step kept.
    pub start: usize,
    /// Last step kept.
    pub end: usize,
}

impl TimeWindow {
    fn contains(self, step: usize) -> bool {
        (self.start..=self.end).contains(&step)
    }
}

/// Inputs of [`agent_cycles`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleParams {
    /// Condition whose run is read.
    pub condition: ConditionKey,
    /// Agent followed.
    pub agent: usize,
    /// Steps kept after normalisation over the whole run.
    pub window: Option<TimeWindow>,
    /// Handling of a constant rank, in-strength or fox usage series.
    pub policy: DegeneratePolicy,
}

/// What one line of the cycle figure shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trace {
    Normalized,
    Clamped,
    Raw,
}

/// Lines in drawing order. Every trace reads component 0 of its metric,
/// which is the hawk weight for the strategy tables.
const TRACES: [(&str, Metric, Trace); 6] = [
    ("Rank", Metric::OutScore, Trace::Normalized),
    ("In-strength", Metric::NetStd, Trace::Normalized),
    ("Host Strategy", Metric::StrategyHost, Trace::Clamped),
    ("Visit Strategy", Metric::StrategyVisit, Trace::Clamped),
    ("Morality", Metric::Morality, Trace::Raw),
    ("Fox Usage", Metric::FoxUsage, Trace::Normalized),
];

/// Build the six traces of one agent.
///
/// Every series is keyed by the condition. Time runs `1..=steps`.
///
/// # Errors
///
/// Fails if a table is missing or malformed, the agent is out of range, the
/// tables disagree on the number of steps, a normalised series is constant
/// under [`DegeneratePolicy::Reject`], or the window keeps no step.
#[allow(clippy::cast_precision_loss)]
pub fn agent_cycles(locator: &dyn RunLocator, params: &CycleParams) -> Result<ComparisonDataset> {
    let condition = params.condition;
    let mut dataset = ComparisonDataset::new(format!("Agent {} cycles", params.agent));
    let mut steps: Option<usize> = None;

    for (label, metric, trace) in TRACES {
        let table = locator.load(&condition, metric, None)?;
        let build = || -> Result<Series> {
            let raw = agent_series(&table, metric, params.agent, 0)?.values;
            if let Some(n) = steps.filter(|n| *n != raw.len()) {
                return Err(AnalysisError::shape(
                    format!("{label} trace"),
                    format!("{} steps, earlier traces had {n}", raw.len()),
                ));
            }
            let values = match trace {
                Trace::Normalized => minmax_normalize(&raw, params.policy)?.into_inner(),
                Trace::Clamped => clamp_unit(&raw),
                Trace::Raw => raw,
            };
            let points: Vec<(f64, f64)> = values
                .into_iter()
                .enumerate()
                .map(|(i, v)| (i.saturating_add(1), v))
                .filter(|(step, _)| params.window.is_none_or(|w| w.contains(*step)))
                .map(|(step, v)| (step as f64, v))
                .collect();
            if points.is_empty() {
                return Err(AnalysisError::empty(format!("{label} trace after windowing")));
            }
            Ok(Series::new(label, points))
        };
        let series = build().map_err(|e| e.in_condition(condition))?;
        if steps.is_none() {
            steps = Some(table.rows());
        }
        dataset.insert(condition, series);
    }

    debug!(%condition, agent = params.agent, steps = steps.unwrap_or(0), "agent cycles");
    Ok(dataset)
}
