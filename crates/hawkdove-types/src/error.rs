//! Error types for the `hawkdove-types` crate.

/// Errors raised when parsing metrics, regimes, or power asymmetry values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string does not name a known output metric.
    #[error("unknown metric: {0}")]
    UnknownMetric(String),

    /// The string is not a `<rank>rank_<network>net` regime directory name.
    #[error("unknown regime: {0}")]
    UnknownRegime(String),

    /// The power asymmetry value is negative, not finite, or finer than a
    /// thousandth.
    #[error("invalid power asymmetry: {0}")]
    InvalidPowerAsymmetry(String),
}
