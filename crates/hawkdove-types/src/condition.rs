//! Experimental conditions and the key that groups runs by them.
//!
//! A simulation sweep varies population size, the rank/network regime, and
//! the power-asymmetry parameter `f`. On disk each combination lives in its
//! own directory, e.g. `dynamicrank_staticnet/ff_0.4/` or
//! `population/50/ff_0.7/`. [`ConditionKey`] is the typed form of that
//! directory and the grouping key every comparison figure is built on.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Thousandths per unit of power asymmetry.
const MILLI: u32 = 1000;

/// Upper bound accepted for `f` (well beyond any sweep in use).
const MAX_POWER_ASYMMETRY: f64 = 1_000_000.0;

/// Float noise allowed, in thousandths, when converting `f` from `f64`.
const MILLI_TOLERANCE: f64 = 1e-6;

/// Whether agent ranks are recomputed during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankRegime {
    /// Ranks are fixed at spawn.
    Static,
    /// Ranks follow the output score.
    Dynamic,
}

/// Whether the interaction network rewires during the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkRegime {
    /// Network weights never change.
    Static,
    /// Network weights are learned.
    Dynamic,
}

/// A rank regime paired with a network regime.
///
/// Serialised as its directory name, e.g. `staticrank_dynamicnet`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Regime {
    /// Rank regime.
    pub rank: RankRegime,
    /// Network regime.
    pub network: NetworkRegime,
}

impl Regime {
    /// The four regimes in the order figures list them.
    pub const ALL: [Self; 4] = [
        Self::new(RankRegime::Static, NetworkRegime::Static),
        Self::new(RankRegime::Static, NetworkRegime::Dynamic),
        Self::new(RankRegime::Dynamic, NetworkRegime::Dynamic),
        Self::new(RankRegime::Dynamic, NetworkRegime::Static),
    ];

    /// Create a regime.
    pub const fn new(rank: RankRegime, network: NetworkRegime) -> Self {
        Self { rank, network }
    }

    /// Directory name used by the simulation output.
    pub const fn dir_name(self) -> &'static str {
        match (self.rank, self.network) {
            (RankRegime::Static, NetworkRegime::Static) => "staticrank_staticnet",
            (RankRegime::Static, NetworkRegime::Dynamic) => "staticrank_dynamicnet",
            (RankRegime::Dynamic, NetworkRegime::Dynamic) => "dynamicrank_dynamicnet",
            (RankRegime::Dynamic, NetworkRegime::Static) => "dynamicrank_staticnet",
        }
    }

    /// Human-readable label for legends and bar axes.
    pub const fn label(self) -> &'static str {
        match (self.rank, self.network) {
            (RankRegime::Static, NetworkRegime::Static) => "Static network, static rank",
            (RankRegime::Static, NetworkRegime::Dynamic) => "Dynamic network, static rank",
            (RankRegime::Dynamic, NetworkRegime::Dynamic) => "Dynamic network, dynamic rank",
            (RankRegime::Dynamic, NetworkRegime::Static) => "Static network, dynamic rank",
        }
    }
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl FromStr for Regime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.dir_name() == s)
            .ok_or_else(|| ParseError::UnknownRegime(s.to_owned()))
    }
}

impl TryFrom<String> for Regime {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Regime> for String {
    fn from(regime: Regime) -> Self {
        regime.dir_name().to_owned()
    }
}

/// The power-asymmetry parameter `f`.
///
/// Stored in thousandths so it can be hashed, ordered, and used as a map
/// key. Values finer than a thousandth (`0.1234`) are rejected rather than
/// rounded, so two distinct inputs never share a key. Formats the way the simulation names its directories: `0.0`, `0.4`,
/// `1.0`, `0.25`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct PowerAsymmetry(u32);

impl PowerAsymmetry {
    /// Build from thousandths (`400` is `f = 0.4`).
    pub const fn from_milli(milli: u32) -> Self {
        Self(milli)
    }

    /// Value in thousandths.
    pub const fn milli(self) -> u32 {
        self.0
    }

    /// Value as a float.
    pub fn value(self) -> f64 {
        f64::from(self.0) / f64::from(MILLI)
    }

    /// Directory segment, e.g. `ff_0.4`.
    pub fn dir_name(self) -> String {
        format!("ff_{self}")
    }

    /// The standard sweep `0.0, 0.1, ..., 1.0`.
    pub fn standard_sweep() -> Vec<Self> {
        (0..=10_u32).map(|tenth| Self(tenth.saturating_mul(100))).collect()
    }
}

impl TryFrom<f64> for PowerAsymmetry {
    type Error = ParseError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        if !value.is_finite() || value < 0.0 || value > MAX_POWER_ASYMMETRY {
            return Err(ParseError::InvalidPowerAsymmetry(value.to_string()));
        }
        let exact = value * f64::from(MILLI);
        let scaled = exact.round();
        if (exact - scaled).abs() > MILLI_TOLERANCE {
            return Err(ParseError::InvalidPowerAsymmetry(value.to_string()));
        }
        // Bounded above by MAX_POWER_ASYMMETRY * 1000, which fits in u32.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let milli = scaled as u32;
        Ok(Self(milli))
    }
}

impl From<PowerAsymmetry> for f64 {
    fn from(f: PowerAsymmetry) -> Self {
        f.value()
    }
}

impl FromStr for PowerAsymmetry {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: f64 = s
            .trim()
            .parse()
            .map_err(|_parse_err: std::num::ParseFloatError| {
                ParseError::InvalidPowerAsymmetry(s.to_owned())
            })?;
        Self::try_from(value)
    }
}

impl fmt::Display for PowerAsymmetry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / MILLI;
        let frac = self.0 % MILLI;
        if frac == 0 {
            write!(f, "{whole}.0")
        } else {
            let digits = format!("{frac:03}");
            write!(f, "{whole}.{}", digits.trim_end_matches('0'))
        }
    }
}

/// The experimental condition a run belongs to.
///
/// Any component may be absent: population sweeps carry no regime, regime
/// comparisons carry no population. Ordering is population, then regime,
/// then `f`, which is also the order series appear in figures.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ConditionKey {
    /// Number of agents in the simulated population.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub population: Option<u32>,
    /// Rank/network regime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regime: Option<Regime>,
    /// Power asymmetry `f`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<PowerAsymmetry>,
}

impl ConditionKey {
    /// Condition of a regime sweep at one `f`.
    pub const fn for_regime(regime: Regime, power: PowerAsymmetry) -> Self {
        Self {
            population: None,
            regime: Some(regime),
            power: Some(power),
        }
    }

    /// Condition of a population sweep at one `f`.
    pub const fn for_population(population: u32, power: PowerAsymmetry) -> Self {
        Self {
            population: Some(population),
            regime: None,
            power: Some(power),
        }
    }

    /// The same condition with `f` removed, used to group a sweep's points
    /// into one series.
    pub const fn without_power(self) -> Self {
        Self {
            population: self.population,
            regime: self.regime,
            power: None,
        }
    }

    /// Directory of this condition relative to an output root.
    ///
    /// Layout: `<regime>/<population_dir>/<n>/ff_<f>`, each segment present
    /// only when the matching component is set.
    pub fn relative_dir(&self, population_dir: &str) -> PathBuf {
        let mut dir = PathBuf::new();
        if let Some(regime) = self.regime {
            dir.push(regime.dir_name());
        }
        if let Some(population) = self.population {
            dir.push(population_dir);
            dir.push(population.to_string());
        }
        if let Some(power) = self.power {
            dir.push(power.dir_name());
        }
        dir
    }
}

impl fmt::Display for ConditionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::with_capacity(3);
        if let Some(population) = self.population {
            parts.push(format!("population={population}"));
        }
        if let Some(regime) = self.regime {
            parts.push(format!("regime={regime}"));
        }
        if let Some(power) = self.power {
            parts.push(format!("f={power}"));
        }
        if parts.is_empty() {
            f.write_str("(all conditions)")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn regime_dir_names_round_trip() {
        for regime in Regime::ALL {
            assert_eq!(regime.dir_name().parse::<Regime>().unwrap(), regime);
        }
    }

    #[test]
    fn regime_serialises_as_dir_name() {
        let regime = Regime::new(RankRegime::Dynamic, NetworkRegime::Static);
        let json = serde_json::to_string(&regime).unwrap();
        assert_eq!(json, "\"dynamicrank_staticnet\"");
        let back: Regime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, regime);
    }

    #[test]
    fn unknown_regime_is_rejected() {
        assert!("staticrank".parse::<Regime>().is_err());
    }

    #[test]
    fn power_formats_like_directory_names() {
        assert_eq!(PowerAsymmetry::from_milli(0).to_string(), "0.0");
        assert_eq!(PowerAsymmetry::from_milli(400).to_string(), "0.4");
        assert_eq!(PowerAsymmetry::from_milli(1000).to_string(), "1.0");
        assert_eq!(PowerAsymmetry::from_milli(250).to_string(), "0.25");
        assert_eq!(PowerAsymmetry::from_milli(1500).dir_name(), "ff_1.5");
    }

    #[test]
    fn power_from_float_absorbs_float_noise() {
        let f = PowerAsymmetry::try_from(0.1 + 0.2).unwrap();
        assert_eq!(f.milli(), 300);
        assert_eq!(f.value(), 0.3);
        assert!(PowerAsymmetry::try_from(-0.1).is_err());
        assert!(PowerAsymmetry::try_from(f64::NAN).is_err());
        assert_eq!("0.7".parse::<PowerAsymmetry>().unwrap().milli(), 700);
        assert!("abc".parse::<PowerAsymmetry>().is_err());
    }

    #[test]
    fn power_finer_than_thousandths_is_rejected() {
        assert!(PowerAsymmetry::try_from(0.1234).is_err());
        assert!("0.0005".parse::<PowerAsymmetry>().is_err());
        assert_eq!(PowerAsymmetry::try_from(0.123).unwrap().milli(), 123);
    }

    #[test]
    fn standard_sweep_has_eleven_steps() {
        let sweep = PowerAsymmetry::standard_sweep();
        assert_eq!(sweep.len(), 11);
        assert_eq!(sweep.first().unwrap().to_string(), "0.0");
        assert_eq!(sweep.last().unwrap().to_string(), "1.0");
    }

    #[test]
    fn condition_dirs() {
        let f = PowerAsymmetry::from_milli(600);
        let regime = Regime::new(RankRegime::Static, NetworkRegime::Dynamic);
        assert_eq!(
            ConditionKey::for_regime(regime, f).relative_dir("population"),
            Path::new("staticrank_dynamicnet/ff_0.6")
        );
        assert_eq!(
            ConditionKey::for_population(50, f).relative_dir("population"),
            Path::new("population/50/ff_0.6")
        );
        assert_eq!(
            ConditionKey::for_population(50, f)
                .without_power()
                .relative_dir("population"),
            Path::new("population/50")
        );
    }

    #[test]
    fn condition_ordering_groups_by_population_first() {
        let low = ConditionKey::for_population(20, PowerAsymmetry::from_milli(900));
        let high = ConditionKey::for_population(50, PowerAsymmetry::from_milli(0));
        assert!(low < high);
    }

    #[test]
    fn condition_display_names_every_component() {
        let key = ConditionKey::for_population(100, PowerAsymmetry::from_milli(300));
        assert_eq!(key.to_string(), "population=100 f=0.3");
        assert_eq!(ConditionKey::default().to_string(), "(all conditions)");
    }
}
