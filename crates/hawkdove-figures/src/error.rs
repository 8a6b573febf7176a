//! Error types for the figure generator binary.
//!
//! [`FigureError`] wraps every failure a figure job can hit so `main` can
//! propagate it with `?` and report it with context.

use std::path::PathBuf;

/// Top-level error for the figure generator.
#[derive(Debug, thiserror::Error)]
pub enum FigureError {
    /// Configuration could not be read or did not match the schema.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        source: Box<config::ConfigError>,
    },

    /// A configuration value is present but unusable.
    #[error("invalid config value {key}: {reason}")]
    InvalidConfig {
        /// Dotted key of the value.
        key: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Loading or reducing simulation output failed.
    #[error("analysis error: {source}")]
    Analysis {
        /// The underlying analysis error.
        #[from]
        source: hawkdove_analysis::AnalysisError,
    },

    /// Drawing a figure failed.
    #[error("render error: {source}")]
    Render {
        /// The underlying render error.
        #[from]
        source: hawkdove_render::RenderError,
    },

    /// A dataset sidecar could not be serialized.
    #[error("sidecar serialization failed: {source}")]
    Sidecar {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// Writing an output file failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl From<config::ConfigError> for FigureError {
    fn from(source: config::ConfigError) -> Self {
        Self::Config {
            source: Box::new(source),
        }
    }
}
