pub mod artifact;
pub mod config;
pub mod error;
pub mod orchestrate;
pub mod report;
pub mod rules;
pub mod tools;

use std::path::Path;

use tracing::info;

pub use config::TriageConfig;
pub use error::{Result, TriageError};

use crate::report::model::{Report, ToolInfo};

pub const TOOL_NAME: &str = "triage";

/// JSON schema version of triage reports.
/// Bump only when the report shape changes semantically.
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Runs the full pipeline on one artifact: fingerprint, tool fan-out,
/// scoring, report assembly.
///
/// `filename` is the display name used by the extension rules; it may differ
/// from the base name of `path`. An empty `requested` list falls back to the
/// configured default selection. A missing or non-regular artifact fails
/// before it is opened or any tool is started.
pub async fn inspect(
    config: &TriageConfig,
    path: &Path,
    filename: &str,
    requested: &[String],
    tool: ToolInfo,
) -> Result<Report> {
    orchestrate::ensure_artifact(path).await?;

    let artifact_path = path.to_path_buf();
    let artifact = tokio::task::spawn_blocking(move || artifact::read_artifact(&artifact_path))
        .await
        .map_err(|err| TriageError::Io(std::io::Error::other(err)))??;

    let tools = config.selection(requested);
    let results = config.orchestrator().analyze(path, &tools).await?;

    let triggered = rules::evaluate(&results, filename);
    let score = rules::classify(&triggered);
    info!(
        file = filename,
        score = score.score,
        verdict = %score.verdict,
        "triage complete"
    );

    Ok(Report::new(tool, filename, artifact, score, triggered, results))
}
