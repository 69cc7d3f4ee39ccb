//! Fan-out of tool invocations for one artifact.
//!
//! Each requested tool runs in its own task. Failures stay local to the tool
//! that produced them: the result map always holds exactly one entry per
//! distinct requested identifier, whatever happened to the others.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::error::{Result, TriageError};
use crate::tools::{AnalysisResult, FailureKind, Invoker, ToolOutcome, ToolRegistry};

#[derive(Debug, Clone)]
pub struct Orchestrator {
    registry: Arc<ToolRegistry>,
    invoker: Invoker,
}

impl Orchestrator {
    pub fn new(registry: Arc<ToolRegistry>, invoker: Invoker) -> Self {
        Self { registry, invoker }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn invoker(&self) -> Invoker {
        self.invoker
    }

    /// Runs every requested tool against `path` and collects their outcomes.
    ///
    /// Fails only when `path` is not an existing regular file; that check
    /// happens before any tool is started. Unknown identifiers are recorded
    /// as `tool-not-configured`. Duplicate identifiers run once.
    pub async fn analyze<S: AsRef<str>>(&self, path: &Path, tools: &[S]) -> Result<AnalysisResult> {
        ensure_artifact(path).await?;

        let mut requested: Vec<&str> = Vec::with_capacity(tools.len());
        for tool in tools {
            let tool = tool.as_ref();
            if !requested.contains(&tool) {
                requested.push(tool);
            }
        }

        info!(path = %path.display(), tools = requested.len(), "starting analysis");

        let mut slots: Vec<Option<ToolOutcome>> = vec![None; requested.len()];
        let mut running = JoinSet::new();

        for (index, tool) in requested.iter().enumerate() {
            let Some(spec) = self.registry.lookup(tool) else {
                debug!(tool = *tool, "tool not configured");
                slots[index] = Some(ToolOutcome::failed(
                    FailureKind::ToolNotConfigured,
                    format!("no template configured for '{tool}'"),
                ));
                continue;
            };

            let spec = spec.clone();
            let path = path.to_path_buf();
            let invoker = self.invoker;
            running.spawn(async move { (index, invoker.run(&spec, &path).await) });
        }

        // Dropping the set aborts outstanding tasks, and with them their
        // children.
        while let Some(joined) = running.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => warn!(error = %err, "tool task did not complete"),
            }
        }

        let result: AnalysisResult = requested
            .into_iter()
            .zip(slots)
            .map(|(tool, slot)| {
                let outcome = slot.unwrap_or_else(|| {
                    ToolOutcome::failed(
                        FailureKind::OtherExecutionError,
                        "tool task aborted before completion",
                    )
                });
                (tool, outcome)
            })
            .collect();

        Ok(result)
    }
}

/// Rejects paths that are missing or not regular files.
pub async fn ensure_artifact(path: &Path) -> Result<()> {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(()),
        _ => Err(TriageError::ArtifactNotFound {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{ToolSpec, default_registry};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn artifact() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"hello triage").unwrap();
        file.flush().unwrap();
        file
    }

    fn fake(name: &str, script: &str) -> ToolSpec {
        ToolSpec::new(name, ["sh", "-c", script, "{file}"], vec![]).unwrap()
    }

    fn orchestrator(specs: Vec<ToolSpec>, timeout: Duration) -> Orchestrator {
        Orchestrator::new(Arc::new(ToolRegistry::new(specs)), Invoker::new(timeout))
    }

    #[tokio::test]
    async fn missing_artifact_fails_before_running_tools() {
        let orch = Orchestrator::new(Arc::new(default_registry()), Invoker::default());

        let err = orch
            .analyze(Path::new("/definitely/not/here.bin"), &["file"])
            .await
            .unwrap_err();

        assert!(matches!(err, TriageError::ArtifactNotFound { .. }));
    }

    #[tokio::test]
    async fn directory_is_not_an_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let orch = Orchestrator::new(Arc::new(default_registry()), Invoker::default());

        assert!(orch.analyze(dir.path(), &["file"]).await.is_err());
    }

    #[tokio::test]
    async fn unknown_tool_is_not_configured() {
        let file = artifact();
        let orch = orchestrator(vec![], Duration::from_secs(5));

        let result = orch.analyze(file.path(), &["nmap"]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(
            result.get("nmap").unwrap().failure().unwrap().error,
            FailureKind::ToolNotConfigured
        );
    }

    #[tokio::test]
    async fn empty_request_yields_empty_result() {
        let file = artifact();
        let orch = orchestrator(vec![], Duration::from_secs(5));

        let result = orch.analyze::<&str>(file.path(), &[]).await.unwrap();
        assert!(result.is_empty());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failures_are_isolated_per_tool() {
        let file = artifact();
        let orch = orchestrator(
            vec![
                fake("cat", "cat \"$0\""),
                fake("hang", "sleep 10"),
                ToolSpec::new("ghost", ["triage-missing-binary-91c2", "{file}"], vec![]).unwrap(),
            ],
            Duration::from_millis(300),
        );

        let result = orch
            .analyze(file.path(), &["hang", "cat", "nmap", "ghost"])
            .await
            .unwrap();

        assert_eq!(
            result.tools().collect::<Vec<_>>(),
            vec!["hang", "cat", "nmap", "ghost"]
        );
        assert_eq!(result.stdout("cat"), Some("hello triage"));
        assert_eq!(
            result.get("hang").unwrap().failure().unwrap().error,
            FailureKind::Timeout
        );
        assert_eq!(
            result.get("nmap").unwrap().failure().unwrap().error,
            FailureKind::ToolNotConfigured
        );
        assert_eq!(
            result.get("ghost").unwrap().failure().unwrap().error,
            FailureKind::ToolUnavailable
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn duplicates_run_once_and_unrequested_tools_never_appear() {
        let file = artifact();
        let orch = orchestrator(
            vec![fake("a", "echo a"), fake("b", "echo b")],
            Duration::from_secs(5),
        );

        let result = orch.analyze(file.path(), &["a", "a"]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert!(!result.contains("b"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn tools_run_concurrently() {
        let file = artifact();
        let orch = orchestrator(
            vec![
                fake("s1", "sleep 1"),
                fake("s2", "sleep 1"),
                fake("s3", "sleep 1"),
            ],
            Duration::from_secs(10),
        );
        let started = std::time::Instant::now();

        let result = orch.analyze(file.path(), &["s1", "s2", "s3"]).await.unwrap();

        assert_eq!(result.len(), 3);
        assert!(started.elapsed() < Duration::from_millis(2900));
    }
}
