//! Error types for the `hawkdove-analysis` crate.
//!
//! All fallible operations in this crate return [`AnalysisError`] through the
//! [`Result`] alias. Errors surface immediately: there is no retry and no
//! partial result. Study pipelines wrap failures in
//! [`AnalysisError::Condition`] so the message names the condition whose
//! input was missing or malformed.

use std::path::PathBuf;

use hawkdove_types::ConditionKey;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while loading or deriving analysis data.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// An input table does not exist.
    #[error("input file not found: {}", path.display())]
    FileNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An input table has ragged rows or non-numeric cells.
    #[error("malformed table {} at line {line}: {reason}", path.display())]
    MalformedTable {
        /// The offending file.
        path: PathBuf,
        /// One-based line number in the file.
        line: u64,
        /// What was wrong with the line.
        reason: String,
    },

    /// Data does not fit the fixed-stride layout assumed for it.
    #[error("shape mismatch in {context}: {reason}")]
    ShapeMismatch {
        /// What was being reshaped or indexed.
        context: String,
        /// Expected versus actual shape.
        reason: String,
    },

    /// An aggregation was attempted on zero rows or values.
    #[error("empty input: {context}")]
    EmptyInput {
        /// What was empty.
        context: String,
    },

    /// Every value in a range-dependent computation is identical.
    #[error("degenerate range in {context}: every value is {value}")]
    DegenerateRange {
        /// What was being normalised.
        context: String,
        /// The single value the input collapsed to.
        value: f64,
    },

    /// A NaN or infinite value reached a computation that cannot absorb it.
    #[error("non-finite value in {context} at index {index}")]
    NonFinite {
        /// What was being computed.
        context: String,
        /// Position of the first offending value.
        index: usize,
    },

    /// A condition has no input mapping in the configured layout.
    #[error("no input mapped for {condition}: {reason}")]
    UnmappedCondition {
        /// The condition that could not be located.
        condition: ConditionKey,
        /// Why the layout could not resolve it.
        reason: String,
    },

    /// Reading an input file failed for a reason other than absence.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Any of the above, qualified with the condition it occurred in.
    #[error("{condition}: {source}")]
    Condition {
        /// The condition whose input failed.
        condition: ConditionKey,
        /// The underlying failure.
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Qualify this error with the condition it occurred in.
    ///
    /// Errors already carrying a condition are returned unchanged.
    #[must_use]
    pub fn in_condition(self, condition: ConditionKey) -> Self {
        match self {
            Self::Condition { .. } | Self::UnmappedCondition { .. } => self,
            other => Self::Condition {
                condition,
                source: Box::new(other),
            },
        }
    }

    /// Shorthand for [`AnalysisError::ShapeMismatch`].
    pub fn shape(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ShapeMismatch {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`AnalysisError::EmptyInput`].
    pub fn empty(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use hawkdove_types::PowerAsymmetry;

    use super::*;

    #[test]
    fn condition_context_names_condition_and_path() {
        let key = ConditionKey::for_population(20, PowerAsymmetry::from_milli(400));
        let err = AnalysisError::FileNotFound {
            path: PathBuf::from("population/20/ff_0.4/FoxUsage_0.csv"),
        }
        .in_condition(key);
        let message = err.to_string();
        assert!(message.contains("population=20 f=0.4"), "{message}");
        assert!(message.contains("FoxUsage_0.csv"), "{message}");
    }

    #[test]
    fn condition_context_is_not_nested_twice() {
        let key = ConditionKey::for_population(20, PowerAsymmetry::from_milli(400));
        let err = AnalysisError::empty("rows")
            .in_condition(key)
            .in_condition(ConditionKey::default());
        assert!(matches!(
            err,
            AnalysisError::Condition { condition, .. } if condition == key
        ));
    }
}
