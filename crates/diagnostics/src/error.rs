//! Error types for the diagnostics crate.

use thiserror::Error;

/// Errors that can occur while recording or querying timing data.
#[derive(Debug, Error)]
pub enum DiagnosticsError {
    /// A measure referenced a mark that is not in the timeline log
    #[error("no mark named \"{0}\" in the timeline log")]
    MissingMark(String),

    /// Failed to serialize a metrics snapshot
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for diagnostics operations.
pub type DiagnosticsResult<T> = Result<T, DiagnosticsError>;
