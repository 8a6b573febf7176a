//! Simulation output file kinds.
//!
//! Each metric is written by the simulation as its own CSV file. Rows are
//! time steps (or runs); columns are a flattened agent x component layout
//! whose width per agent is the metric's *stride*:
//!
//! | Metric | Stride | Components |
//! |--------|--------|------------|
//! | `OutScore` | 1 | rank |
//! | `NetSTD` | 1 | in-strength |
//! | `StrategyHost` | 2 | hawk, dove |
//! | `StrategyVisit` | 3 | hawk, dove, fox |
//! | `Morality` | 1 | morality |
//! | `FoxUsage` | 1 | fox usage |
//! | `TotalPayoff` | 1 | payoff |
//! | `EvoStats` | 1 | population statistics (not split by agent) |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A simulation output file kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// Output score, used as the agent's rank.
    OutScore,
    /// Network in-strength weight.
    #[serde(rename = "NetSTD")]
    NetStd,
    /// Host-role strategy weights (hawk, dove).
    StrategyHost,
    /// Visitor-role strategy weights (hawk, dove, fox).
    StrategyVisit,
    /// Morality score.
    Morality,
    /// Fox strategy usage.
    FoxUsage,
    /// Accumulated payoff.
    TotalPayoff,
    /// Population-wide evolutionary statistics.
    EvoStats,
}

impl Metric {
    /// Every metric, in file-listing order.
    pub const ALL: [Self; 8] = [
        Self::OutScore,
        Self::NetStd,
        Self::StrategyHost,
        Self::StrategyVisit,
        Self::Morality,
        Self::FoxUsage,
        Self::TotalPayoff,
        Self::EvoStats,
    ];

    /// Number of columns each agent occupies in one row.
    pub const fn stride(self) -> usize {
        match self {
            Self::StrategyHost => 2,
            Self::StrategyVisit => 3,
            Self::OutScore
            | Self::NetStd
            | Self::Morality
            | Self::FoxUsage
            | Self::TotalPayoff
            | Self::EvoStats => 1,
        }
    }

    /// File name stem written by the simulation (`NetSTD_0.csv` etc.).
    pub const fn file_stem(self) -> &'static str {
        match self {
            Self::OutScore => "OutScore",
            Self::NetStd => "NetSTD",
            Self::StrategyHost => "StrategyHost",
            Self::StrategyVisit => "StrategyVisit",
            Self::Morality => "Morality",
            Self::FoxUsage => "FoxUsage",
            Self::TotalPayoff => "TotalPayoff",
            Self::EvoStats => "EvoStats",
        }
    }

    /// Whether the columns are split per agent.
    ///
    /// `EvoStats` rows hold population-wide aggregates, so agent-indexed
    /// access is meaningless for it.
    pub const fn per_agent(self) -> bool {
        !matches!(self, Self::EvoStats)
    }

    /// Column offset of a strategy component within one agent's block, if
    /// this metric carries that component.
    pub const fn component_offset(self, component: StrategyComponent) -> Option<usize> {
        match (self, component) {
            (Self::StrategyHost | Self::StrategyVisit, StrategyComponent::Hawk) => Some(0),
            (Self::StrategyHost | Self::StrategyVisit, StrategyComponent::Dove) => Some(1),
            (Self::StrategyVisit, StrategyComponent::Fox) => Some(2),
            _ => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_stem())
    }
}

impl FromStr for Metric {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.file_stem() == s)
            .ok_or_else(|| ParseError::UnknownMetric(s.to_owned()))
    }
}

/// One component of an agent's strategy vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyComponent {
    /// Weight on playing hawk.
    Hawk,
    /// Weight on playing dove.
    Dove,
    /// Weight on the fox (innovation) strategy; visitor role only.
    Fox,
}
