//! Error types for chapterize.

use std::path::PathBuf;

use crate::config::ConfigError;

/// Errors that can occur while segmenting or exporting a document.
///
/// Soft failures inside detection (an unparseable numeral, a rejected
/// candidate, an empty result) are not errors; they surface as absent
/// chapters.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid detector or cache configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A custom boundary pattern failed to compile.
    #[error("invalid boundary pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern source.
        pattern: String,
        /// The regex compilation error.
        source: regex::Error,
    },

    /// A custom boundary pattern lacks the number and title capture groups.
    #[error("boundary pattern {0:?} must capture a number and a title")]
    MissingCaptureGroups(String),

    /// The document format cannot be decoded by this crate.
    #[error("unsupported document format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Reading a document failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The document path.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The chapter sink refused a chapter; the export run was aborted.
    #[error("failed to save chapter {number} ({title:?}): {source}")]
    Sink {
        /// Number of the chapter that failed to save.
        number: u32,
        /// Title of the chapter that failed to save.
        title: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// An OCR/OMR collaborator reported a failure.
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// Result type for chapterize operations.
pub type Result<T> = std::result::Result<T, Error>;
