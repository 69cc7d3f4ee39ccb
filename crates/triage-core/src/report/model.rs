use serde::{Deserialize, Serialize};

use crate::SCHEMA_VERSION;
use crate::rules::{ScoreReport, TriggeredRule, Verdict};
use crate::tools::AnalysisResult;

/// Top-level triage report.
///
/// `file`, `score`, `verdict`, `reasons` and `results` keep the field names
/// and shapes downstream consumers rely on; the remaining fields are
/// additive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub schema_version: String,
    pub tool: ToolInfo,
    /// Display name of the artifact.
    pub file: String,
    pub artifact: ArtifactInfo,
    pub score: u32,
    pub verdict: Verdict,
    pub reasons: Vec<String>,
    pub triggered: Vec<TriggeredRule>,
    pub results: AnalysisResult,
}

impl Report {
    pub fn new(
        tool: ToolInfo,
        file: impl Into<String>,
        artifact: ArtifactInfo,
        score: ScoreReport,
        triggered: Vec<TriggeredRule>,
        results: AnalysisResult,
    ) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tool,
            file: file.into(),
            artifact,
            score: score.score,
            verdict: score.verdict,
            reasons: score.reasons,
            triggered,
            results,
        }
    }

    /// The `{score, verdict, reasons}` view of this report.
    pub fn score_report(&self) -> ScoreReport {
        ScoreReport {
            score: self.score,
            verdict: self.verdict,
            reasons: self.reasons.clone(),
        }
    }
}

/// Tool metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

/// Artifact metadata bound to this report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactInfo {
    /// Path the tools were run against.
    pub path: String,
    pub size_bytes: u64,
    pub hash: ArtifactHash,
}

/// Cryptographic artifact fingerprint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactHash {
    pub algorithm: String,
    pub value: String,
}
