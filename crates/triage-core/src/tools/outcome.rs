use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Result of a single tool invocation.
///
/// Serialized without a tag: a completed run renders as
/// `{cmd, returncode, stdout, stderr, elapsed}`, a failure as
/// `{error, message}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolOutcome {
    Completed(ToolRun),
    Failed(ToolFailure),
}

impl ToolOutcome {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        ToolOutcome::Failed(ToolFailure {
            error: kind,
            message: message.into(),
        })
    }

    /// The run details, if the tool ran to completion.
    pub fn completed(&self) -> Option<&ToolRun> {
        match self {
            ToolOutcome::Completed(run) => Some(run),
            ToolOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ToolFailure> {
        match self {
            ToolOutcome::Completed(_) => None,
            ToolOutcome::Failed(failure) => Some(failure),
        }
    }
}

/// Folds `\r\n` and lone `\r` line breaks into `\n`.
///
/// Captured output is stored in this form, so line counts and character
/// windows do not depend on the platform a tool was built for.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// A tool that ran to completion. A non-zero `returncode` is still a
/// completed run; the output is kept as evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRun {
    /// Resolved command line, for display only.
    pub cmd: String,
    /// Exit status, `-1` if the process was terminated by a signal.
    pub returncode: i32,
    pub stdout: String,
    pub stderr: String,
    /// Wall-clock seconds from spawn to exit.
    pub elapsed: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolFailure {
    pub error: FailureKind,
    pub message: String,
}

/// Per-tool failure taxonomy. None of these abort an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The process did not finish within the timeout and was killed.
    Timeout,
    /// The executable could not be found on this host.
    ToolUnavailable,
    /// Any other spawn or wait fault.
    OtherExecutionError,
    /// The requested identifier is not in the registry.
    ToolNotConfigured,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ToolUnavailable => "tool-unavailable",
            FailureKind::OtherExecutionError => "other-execution-error",
            FailureKind::ToolNotConfigured => "tool-not-configured",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcomes of one analysis, keyed by tool identifier in request order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnalysisResult {
    outcomes: IndexMap<String, ToolOutcome>,
}

impl AnalysisResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome. Re-inserting a key replaces its value but keeps
    /// the original position.
    pub fn insert(&mut self, tool: impl Into<String>, outcome: ToolOutcome) {
        self.outcomes.insert(tool.into(), outcome);
    }

    pub fn get(&self, tool: &str) -> Option<&ToolOutcome> {
        self.outcomes.get(tool)
    }

    pub fn completed(&self, tool: &str) -> Option<&ToolRun> {
        self.get(tool).and_then(ToolOutcome::completed)
    }

    /// Stdout of `tool`, only if it completed.
    pub fn stdout(&self, tool: &str) -> Option<&str> {
        self.completed(tool).map(|run| run.stdout.as_str())
    }

    /// Stderr of `tool`, only if it completed.
    pub fn stderr(&self, tool: &str) -> Option<&str> {
        self.completed(tool).map(|run| run.stderr.as_str())
    }

    pub fn contains(&self, tool: &str) -> bool {
        self.outcomes.contains_key(tool)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ToolOutcome)> {
        self.outcomes.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn tools(&self) -> impl Iterator<Item = &str> {
        self.outcomes.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, ToolOutcome)> for AnalysisResult {
    fn from_iter<T: IntoIterator<Item = (K, ToolOutcome)>>(iter: T) -> Self {
        let mut result = AnalysisResult::new();
        for (tool, outcome) in iter {
            result.insert(tool, outcome);
        }
        result
    }
}
