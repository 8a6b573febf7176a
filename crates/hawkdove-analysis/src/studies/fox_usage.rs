//! Fox usage per population and power asymmetry.
//!
//! Each point is the mean of a `FoxUsage` table with its first and last rows
//! dropped, divided by a fixed scale. The general trend is the NaN-aware
//! mean of every population's curve at each `f`.

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry};
use tracing::debug;

use super::{agents_of, population_key};
use crate::aggregate::{nanmean_columns, trimmed_mean};
use crate::dataset::{ComparisonDataset, Series};
use crate::error::{AnalysisError, Result};
use crate::layout::RunLocator;

/// Label of the summary series.
pub const GENERAL_TREND: &str = "General Trend";

/// Inputs of [`fox_usage`].
#[derive(Debug, Clone, PartialEq)]
pub struct FoxUsageParams {
    /// Population sizes, one series each.
    pub populations: Vec<u32>,
    /// Power asymmetries, one point each.
    pub sweep: Vec<PowerAsymmetry>,
    /// Divisor turning accumulated usage counts into a proportion.
    pub scale: f64,
}

/// Build the fox usage comparison across populations.
///
/// # Errors
///
/// Fails on the first missing or malformed table, on tables too short to
/// trim, and on a non-positive `scale`.
pub fn fox_usage(locator: &dyn RunLocator, params: &FoxUsageParams) -> Result<ComparisonDataset> {
    if params.scale.is_nan() || params.scale <= 0.0 {
        return Err(AnalysisError::DegenerateRange {
            context: "fox usage scale".to_owned(),
            value: params.scale,
        });
    }

    let xs: Vec<f64> = params.sweep.iter().map(|f| f.value()).collect();
    let mut dataset = ComparisonDataset::new("Power Asymmetry vs. Proportion of Foxes");
    let mut curves = Vec::with_capacity(params.populations.len());

    for &population in &params.populations {
        let agents = agents_of(population)?;
        let mut ys = Vec::with_capacity(params.sweep.len());
        for &f in &params.sweep {
            let condition = ConditionKey::for_population(population, f);
            let table = locator.load(&condition, Metric::FoxUsage, Some(agents))?;
            let mean = trimmed_mean(&table).map_err(|e| e.in_condition(condition))?;
            debug!(%condition, mean, "fox usage");
            ys.push(mean / params.scale);
        }
        dataset.insert(
            population_key(population),
            Series::from_xy(format!("N = {population}"), &xs, &ys),
        );
        curves.push(ys);
    }

    if !curves.is_empty() {
        let trend = nanmean_columns(&curves)?;
        dataset.push_summary(Series::from_xy(GENERAL_TREND, &xs, &trend));
    }
    Ok(dataset)
}
