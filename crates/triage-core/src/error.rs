//! Hard failures of the triage pipeline.
//!
//! Per-tool problems (timeouts, missing binaries, unknown identifiers) are
//! never errors at this level; they are recorded as `ToolOutcome::Failed`
//! entries. Only conditions that invalidate the whole analysis end up here.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriageError {
    /// The artifact path does not exist or is not a regular file.
    #[error("artifact not found: {}", path.display())]
    ArtifactNotFound { path: PathBuf },

    /// A tool template failed validation when building the registry.
    #[error("invalid template for tool '{tool}': {reason}")]
    InvalidToolTemplate { tool: String, reason: String },

    /// The configuration file could not be read or parsed.
    #[error("failed to load config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TriageError>;
