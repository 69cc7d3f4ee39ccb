pub mod catalog;
pub mod classify;
pub mod eval;

pub use catalog::RuleId;
pub use classify::{ScoreReport, Verdict, classify};
pub use eval::{TriggeredRule, evaluate};

use crate::tools::AnalysisResult;

/// Scores an analysis result for an artifact displayed as `filename`.
pub fn score(results: &AnalysisResult, filename: &str) -> ScoreReport {
    classify(&evaluate(results, filename))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::catalog::tool_ids;
    use crate::tools::{FailureKind, ToolOutcome, ToolRun};

    fn completed(stdout: &str) -> ToolOutcome {
        ToolOutcome::Completed(ToolRun {
            cmd: "tool".into(),
            returncode: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            elapsed: 0.2,
        })
    }

    #[test]
    fn jpeg_renamed_to_txt() {
        let results: AnalysisResult = [(tool_ids::FILE, completed("JPEG image data"))]
            .into_iter()
            .collect();

        let report = score(&results, "report.txt");
        assert_eq!(report.score, 15);
        assert_eq!(report.verdict, Verdict::LikelyClean);
        assert_eq!(report.reasons, vec!["JPEG signature but extension mismatch"]);

        assert_eq!(score(&results, "photo.jpg").score, 0);
    }

    #[test]
    fn timed_out_strings_contributes_nothing() {
        let results: AnalysisResult = [(
            tool_ids::STRINGS,
            ToolOutcome::failed(FailureKind::Timeout, "timed out after 25.0s"),
        )]
        .into_iter()
        .collect();

        let report = score(&results, "x.bin");
        assert_eq!(report.score, 0);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn scoring_is_idempotent() {
        let results: AnalysisResult = [
            (tool_ids::FILE, completed("PDF document")),
            (tool_ids::STRINGS, completed("MZ\u{90}\nsecret")),
            (tool_ids::READELF, completed("ELF Header:")),
        ]
        .into_iter()
        .collect();

        let first = serde_json::to_vec(&score(&results, "a.png")).unwrap();
        let second = serde_json::to_vec(&score(&results, "a.png")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn everything_at_once_caps_and_is_malicious() {
        let binwalk = (0..40).map(|i| format!("{i} 0x0 data")).collect::<Vec<_>>().join("\n");
        let mut results: AnalysisResult = [
            (tool_ids::FILE, completed("JPEG PNG PDF")),
            (
                tool_ids::STRINGS,
                completed("MZ ELF password secret private key -----BEGIN"),
            ),
            (tool_ids::BINWALK, completed(&binwalk)),
            (tool_ids::READELF, completed("ELF Header:")),
        ]
        .into_iter()
        .collect();
        results.insert(
            tool_ids::FFPROBE,
            ToolOutcome::Completed(ToolRun {
                cmd: "ffprobe".into(),
                returncode: 1,
                stdout: String::new(),
                stderr: "Invalid data".into(),
                elapsed: 0.1,
            }),
        );

        let report = score(&results, "blob");
        assert_eq!(report.score, 100);
        assert_eq!(report.verdict, Verdict::LikelyMalicious);
        assert_eq!(report.reasons.len(), 3 + 2 + 4 + 1 + 1 + 1);
    }
}
