//! Error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reconstructing a dialog
///
/// None of these reach the host; they are logged and the affected step is
/// skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogError {
    #[error("Failed to parse embedded response id {raw:?} for {label:?}")]
    InvalidEmbeddedResponseId { raw: String, label: String },
}

/// Errors from the runtime's channel surface
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Dialog runtime has stopped")]
    Stopped,
    #[error("Dialog runtime task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Errors loading a recorded trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid trace step on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}
