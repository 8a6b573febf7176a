//! Loading, reshaping, and aggregation of hawk-dove innovation simulation
//! output.
//!
//! Data flows strictly one way through this crate:
//!
//! ```text
//! CSV on disk --> table --> reshape --> normalize / aggregate --> dataset / latex
//! ```
//!
//! # Modules
//!
//! - [`table`] -- [`RunTable`] loader with shape and cell validation.
//! - [`layout`] -- [`RunLocator`] implementations mapping a condition and
//!   metric to a file path.
//! - [`reshape`] -- Fixed-stride extraction of agent series and final-state
//!   attribute matrices.
//! - [`normalize`] -- Min-max normalisation with an explicit policy for
//!   constant series.
//! - [`aggregate`] -- Cumulative shares, NaN-aware means, threshold
//!   classification, rank ordering.
//! - [`latex`] -- Typeset tabular export.
//! - [`dataset`] -- [`ComparisonDataset`], the condition-keyed input of
//!   every comparison figure.
//! - [`studies`] -- The figure pipelines built from the pieces above.
//! - [`error`] -- [`AnalysisError`] taxonomy.
//!
//! [`RunTable`]: table::RunTable
//! [`RunLocator`]: layout::RunLocator
//! [`ComparisonDataset`]: dataset::ComparisonDataset
//! [`AnalysisError`]: error::AnalysisError

pub mod aggregate;
pub mod dataset;
pub mod error;
pub mod latex;
pub mod layout;
pub mod normalize;
pub mod reshape;
pub mod studies;
pub mod table;

// Re-export primary types at crate root.
pub use dataset::{ComparisonDataset, Series};
pub use error::{AnalysisError, Result};
pub use latex::{Cell, TableOptions, to_latex_table};
pub use layout::{IndexedLayout, KeyedLayout, RunLocator};
pub use normalize::{DegeneratePolicy, NormalizedSeries, minmax_normalize};
pub use reshape::{AgentSeries, AttributeMatrix};
pub use table::{LoadOptions, RunTable};
