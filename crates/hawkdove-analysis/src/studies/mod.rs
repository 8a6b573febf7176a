//! Figure pipelines.
//!
//! Each study loads the tables of a set of conditions through a
//! [`RunLocator`], reduces them, and returns plain data ready for rendering.
//! Studies never touch output paths or styling.
//!
//! # Modules
//!
//! - [`pure_hawks`] -- Share of agents that are hawks as both host and
//!   visitor, per population and `f`.
//! - [`fox_usage`] -- Mean fox usage per population and `f`, plus the trend
//!   across populations.
//! - [`fox_weight`] -- Fox weight over time sorted by final rank, and the
//!   rank-by-`f` fox weight table.
//! - [`payoffs`] -- Lorenz curves and totals of final payoffs per regime.
//! - [`cycles`] -- One agent's rank, in-strength, strategy, morality and fox
//!   usage over time.
//! - [`strategy_grid`] -- Per-rank strategy markers across `f`.

pub mod cycles;
pub mod fox_usage;
pub mod fox_weight;
pub mod payoffs;
pub mod pure_hawks;
pub mod strategy_grid;

use hawkdove_types::{ConditionKey, Metric, Regime, StrategyComponent};

use crate::error::{AnalysisError, Result};
use crate::layout::RunLocator;
use crate::reshape;

/// Final-row values of one strategy component across all agents.
pub(crate) fn final_component(
    locator: &dyn RunLocator,
    condition: &ConditionKey,
    metric: Metric,
    which: StrategyComponent,
    agents: Option<usize>,
) -> Result<Vec<f64>> {
    let table = locator.load(condition, metric, agents)?;
    let offset = metric.component_offset(which).ok_or_else(|| {
        AnalysisError::shape(metric.to_string(), format!("no {which:?} component"))
    })?;
    reshape::final_row(&table)
        .and_then(|row| reshape::component(row, metric, offset))
        .map_err(|e| e.in_condition(*condition))
}

/// Final-row values of a stride-1 metric.
pub(crate) fn final_values(
    locator: &dyn RunLocator,
    condition: &ConditionKey,
    metric: Metric,
    agents: Option<usize>,
) -> Result<Vec<f64>> {
    let table = locator.load(condition, metric, agents)?;
    reshape::final_row(&table)
        .map(<[f64]>::to_vec)
        .map_err(|e| e.in_condition(*condition))
}

/// Grouping key of a whole population sweep.
pub fn population_key(population: u32) -> ConditionKey {
    ConditionKey {
        population: Some(population),
        ..ConditionKey::default()
    }
}

/// Grouping key of a whole regime sweep.
pub fn regime_key(regime: Regime) -> ConditionKey {
    ConditionKey {
        regime: Some(regime),
        ..ConditionKey::default()
    }
}

/// Agent count of a population size.
pub(crate) fn agents_of(population: u32) -> Result<usize> {
    usize::try_from(population).map_err(|_| {
        AnalysisError::shape("population", format!("{population} agents do not fit in memory"))
    })
}
