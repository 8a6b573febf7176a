//! Share of pure hawks per population and power asymmetry.
//!
//! An agent is a pure hawk when its final hawk weight exceeds the cutoff in
//! both the visitor and the host role. One series per population, with the
//! share (percent) on `x` and `f` on `y`.

use hawkdove_types::{ConditionKey, Metric, PowerAsymmetry, StrategyComponent};
use tracing::debug;

use super::{agents_of, final_component, population_key};
use crate::aggregate::{share_percent, threshold_classify};
use crate::dataset::{ComparisonDataset, Series};
use crate::error::Result;
use crate::layout::RunLocator;

/// Inputs of [`pure_hawks`].
#[derive(Debug, Clone, PartialEq)]
pub struct PureHawksParams {
    /// Population sizes, one series each.
    pub populations: Vec<u32>,
    /// Power asymmetries, one point each.
    pub sweep: Vec<PowerAsymmetry>,
    /// Hawk weight an agent must strictly exceed in both roles.
    pub cutoff: f64,
}

/// Percentage of pure hawks at one condition.
///
/// # Errors
///
/// Fails if either strategy table is missing, malformed, or does not hold
/// exactly `population` agents.
pub fn pure_hawk_share(
    locator: &dyn RunLocator,
    population: u32,
    power: PowerAsymmetry,
    cutoff: f64,
) -> Result<f64> {
    let agents = agents_of(population)?;
    let condition = ConditionKey::for_population(population, power);
    let visit = final_component(
        locator,
        &condition,
        Metric::StrategyVisit,
        StrategyComponent::Hawk,
        Some(agents),
    )?;
    let host = final_component(
        locator,
        &condition,
        Metric::StrategyHost,
        StrategyComponent::Hawk,
        Some(agents),
    )?;
    let flags =
        threshold_classify(&visit, &host, cutoff).map_err(|e| e.in_condition(condition))?;
    let share = share_percent(&flags, agents).map_err(|e| e.in_condition(condition))?;
    debug!(%condition, share, "pure hawk share");
    Ok(share)
}

/// Build the pure hawk comparison across populations.
///
/// # Errors
///
/// The first failing condition aborts the study.
pub fn pure_hawks(locator: &dyn RunLocator, params: &PureHawksParams) -> Result<ComparisonDataset> {
    let mut dataset = ComparisonDataset::new("Pure Hawks Across Populations");
    for &population in &params.populations {
        let points = params
            .sweep
            .iter()
            .map(|&f| {
                pure_hawk_share(locator, population, f, params.cutoff).map(|share| (share, f.value()))
            })
            .collect::<Result<Vec<_>>>()?;
        dataset.insert(
            population_key(population),
            Series::new(population.to_string(), points),
        );
    }
    Ok(dataset)
}
