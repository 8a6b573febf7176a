//! Shared type definitions for the hawk-dove innovation figures.
//!
//! Every crate in the workspace speaks in terms of the types defined here:
//! which simulation output file is being read, how its columns are laid out,
//! and which experimental condition it belongs to.
//!
//! # Modules
//!
//! - [`metric`] -- Output file kinds and their per-agent column strides.
//! - [`condition`] -- Rank/network regimes, power asymmetry, and the
//!   [`ConditionKey`] used to group and join runs.
//! - [`run_file`] -- Formatting of `<Metric>_<run>_<params>.csv` file
//!   names.
//! - [`error`] -- Parse errors for the types above.
//!
//! [`ConditionKey`]: condition::ConditionKey

pub mod condition;
pub mod error;
pub mod metric;
pub mod run_file;

// Re-export all public types at crate root for convenience.
pub use condition::{ConditionKey, NetworkRegime, PowerAsymmetry, RankRegime, Regime};
pub use error::ParseError;
pub use metric::{Metric, StrategyComponent};
pub use run_file::RunFile;
