use std::fmt::Write;

use crate::report::model::Report;
use crate::tools::{ToolCategory, ToolOutcome, ToolRegistry, ToolSpec};

pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", report.tool.name, report.tool.version);
    let _ = writeln!(
        out,
        "File: {} ({} bytes, {} {})",
        report.file,
        report.artifact.size_bytes,
        report.artifact.hash.algorithm,
        report.artifact.hash.value
    );
    let _ = writeln!(out, "Score: {}/100 ({})", report.score, report.verdict);

    out.push_str("Reasons:\n");
    if report.triggered.is_empty() {
        out.push_str("  (none)\n");
    }
    for r in &report.triggered {
        let _ = writeln!(out, "  - [{} +{}] {}", r.rule_id, r.points, r.reason);
    }

    out.push_str("Tools:\n");
    let width = report.results.tools().map(str::len).max().unwrap_or(0);
    for (tool, outcome) in report.results.iter() {
        match outcome {
            ToolOutcome::Completed(run) => {
                let _ = writeln!(
                    out,
                    "  {tool:<width$}  exit {:<3}  {:.2}s",
                    run.returncode, run.elapsed
                );
            }
            ToolOutcome::Failed(failure) => {
                let _ = writeln!(out, "  {tool:<width$}  {}: {}", failure.error, failure.message);
            }
        }
    }
    out
}

/// Lists tools grouped by category, each with its argument template.
/// Tools without a category are listed last under `other`.
pub fn render_tool_list(registry: &ToolRegistry) -> String {
    let mut out = String::new();
    let width = registry.iter().map(|s| s.name().len()).max().unwrap_or(0);

    let mut write_group = |label: &str, specs: Vec<&ToolSpec>| {
        if specs.is_empty() {
            return;
        }
        let _ = writeln!(out, "{label}:");
        for spec in specs {
            let _ = writeln!(out, "  {:<width$}  {}", spec.name(), spec.args().join(" "));
        }
    };

    for category in ToolCategory::ALL {
        write_group(category.as_str(), registry.in_category(category));
    }
    write_group(
        "other",
        registry.iter().filter(|s| s.categories().is_empty()).collect(),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::model::{ArtifactHash, ArtifactInfo, ToolInfo};
    use crate::rules;
    use crate::tools::{AnalysisResult, FailureKind, ToolRun, default_registry};

    #[test]
    fn renders_score_reasons_and_tools() {
        let mut results = AnalysisResult::new();
        results.insert(
            "file",
            ToolOutcome::Completed(ToolRun {
                cmd: "file -k a.txt".into(),
                returncode: 0,
                stdout: "PNG image data".into(),
                stderr: String::new(),
                elapsed: 0.013,
            }),
        );
        results.insert(
            "strings",
            ToolOutcome::failed(FailureKind::Timeout, "timed out after 25.0s"),
        );
        let triggered = rules::evaluate(&results, "a.txt");
        let report = Report::new(
            ToolInfo {
                name: "triage".into(),
                version: "0.1.0".into(),
            },
            "a.txt",
            ArtifactInfo {
                path: "/tmp/a.txt".into(),
                size_bytes: 10,
                hash: ArtifactHash {
                    algorithm: "sha256".into(),
                    value: "ff".into(),
                },
            },
            rules::classify(&triggered),
            triggered,
            results,
        );

        let text = render_text(&report);

        assert!(text.starts_with("triage 0.1.0\n"));
        assert!(text.contains("Score: 12/100 (Likely Clean)"));
        assert!(text.contains("[R-SIG-02 +12] PNG signature but extension mismatch"));
        assert!(text.contains("file     exit 0    0.01s"));
        assert!(text.contains("strings  timeout: timed out after 25.0s"));
    }

    #[test]
    fn tool_list_groups_by_category() {
        let registry = default_registry().with_tools([
            ToolSpec::new("yara", ["yara", "rules.yar", "{file}"], vec![]).unwrap(),
        ]);

        let text = render_tool_list(&registry);

        let image = text.find("image:").unwrap();
        let binary = text.find("binary:").unwrap();
        let network = text.find("network:").unwrap();
        assert!(image < binary && binary < network);
        assert!(text.contains("identify   identify -verbose {file}"));
        assert!(text.trim_end().ends_with("yara       yara rules.yar {file}"));
        // strings is both an image and a binary tool.
        assert_eq!(text.lines().filter(|l| l.starts_with("  strings ")).count(), 2);
    }
}
