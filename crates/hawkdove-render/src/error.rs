//! Error types for the `hawkdove-render` crate.

use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while drawing a figure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The drawing backend failed.
    #[error("drawing failed: {0}")]
    Draw(String),

    /// No backend handles the output file's extension.
    #[error("unsupported output format for {}: {reason}", path.display())]
    UnsupportedFormat {
        /// Requested output path.
        path: PathBuf,
        /// Why the format is unavailable.
        reason: String,
    },

    /// The data cannot be drawn (empty, non-finite, or out of shape).
    #[error("invalid figure data: {0}")]
    InvalidData(String),

    /// Creating the output directory failed.
    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        /// The directory or file involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for RenderError {
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        Self::Draw(err.to_string())
    }
}
