//! Evidence rules over tool output.
//!
//! Every rule is a pure function of the text it inspects. `evaluate` looks up
//! the relevant tool in the analysis result and only feeds a rule when that
//! tool completed; failed or missing tools contribute nothing.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::rules::catalog::{RuleId, tool_ids};
use crate::tools::{AnalysisResult, normalize_newlines};

/// Number of leading characters of `strings` output searched for headers.
pub const STRINGS_HEAD_CHARS: usize = 800;

/// Keywords searched for in `strings` output, in reporting order.
pub const SENSITIVE_KEYWORDS: [&str; 4] = ["password", "secret", "private key", "-----begin"];

/// Minimum `binwalk` line count (exclusive) before embedded data is flagged.
pub const BINWALK_LINE_THRESHOLD: usize = 2;

const BINWALK_BASE_POINTS: u32 = 5;
const BINWALK_MAX_POINTS: u32 = 25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredRule {
    pub rule_id: RuleId,
    pub points: u32,
    pub reason: String,
    pub evidence: serde_json::Value,
}

impl TriggeredRule {
    fn new(rule_id: RuleId, points: u32, reason: impl Into<String>, evidence: serde_json::Value) -> Self {
        Self {
            rule_id,
            points,
            reason: reason.into(),
            evidence,
        }
    }
}

/// Runs every rule in catalog order against `results`.
pub fn evaluate(results: &AnalysisResult, filename: &str) -> Vec<TriggeredRule> {
    let mut triggered = Vec::new();

    if let Some(out) = results.stdout(tool_ids::FILE) {
        triggered.extend(signature_mismatch(out, filename));
    }

    if let Some(out) = results.stdout(tool_ids::STRINGS) {
        triggered.extend(embedded_headers(out));
        triggered.extend(sensitive_keywords(out));
    }

    if let Some(out) = results.stdout(tool_ids::BINWALK) {
        triggered.extend(binwalk_signatures(out));
    }

    if let Some(err) = results.stderr(tool_ids::FFPROBE) {
        triggered.extend(media_parse_errors(err));
    }

    if let Some(out) = results.stdout(tool_ids::READELF) {
        triggered.extend(readelf_header(out));
    }

    triggered
}

/// Type signatures reported by `file` that disagree with the filename's
/// extension (R-SIG-01..03).
pub fn signature_mismatch(file_stdout: &str, filename: &str) -> Vec<TriggeredRule> {
    const SIGNATURES: [(RuleId, &str, &str, &[&str], u32); 3] = [
        (RuleId::RSig01, "jpeg", "JPEG", &[".jpg", ".jpeg"], 15),
        (RuleId::RSig02, "png", "PNG", &[".png"], 12),
        (RuleId::RSig03, "pdf", "PDF", &[".pdf"], 14),
    ];

    let output = file_stdout.to_lowercase();
    let name = filename.to_lowercase();

    SIGNATURES
        .iter()
        .filter(|(_, needle, _, extensions, _)| {
            output.contains(needle) && !extensions.iter().any(|ext| name.ends_with(ext))
        })
        .map(|(id, _, label, extensions, points)| {
            TriggeredRule::new(
                *id,
                *points,
                format!("{label} signature but extension mismatch"),
                json!({ "filename": filename, "expected_extensions": extensions }),
            )
        })
        .collect()
}

/// PE and ELF markers in the first `STRINGS_HEAD_CHARS` characters of
/// `strings` output (R-BIN-01, R-BIN-02).
pub fn embedded_headers(strings_stdout: &str) -> Vec<TriggeredRule> {
    let head: String = normalize_newlines(strings_stdout)
        .to_lowercase()
        .chars()
        .take(STRINGS_HEAD_CHARS)
        .collect();

    let mut triggered = Vec::new();
    if head.contains("mz") {
        triggered.push(TriggeredRule::new(
            RuleId::RBin01,
            25,
            "Embedded Windows PE (MZ) header detected",
            json!({ "marker": "mz", "window_chars": STRINGS_HEAD_CHARS }),
        ));
    }
    if head.contains("elf") {
        triggered.push(TriggeredRule::new(
            RuleId::RBin02,
            22,
            "Embedded ELF binary detected",
            json!({ "marker": "elf", "window_chars": STRINGS_HEAD_CHARS }),
        ));
    }
    triggered
}

/// One hit per sensitive keyword present anywhere in `strings` output
/// (R-STR-01).
pub fn sensitive_keywords(strings_stdout: &str) -> Vec<TriggeredRule> {
    let output = strings_stdout.to_lowercase();
    SENSITIVE_KEYWORDS
        .iter()
        .filter(|kw| output.contains(*kw))
        .map(|kw| {
            TriggeredRule::new(
                RuleId::RStr01,
                8,
                format!("Sensitive keyword found: {kw}"),
                json!({ "keyword": kw }),
            )
        })
        .collect()
}

/// More than two `binwalk` result lines (R-EMB-01). Scores
/// `min(25, 5 + lines)`.
pub fn binwalk_signatures(binwalk_stdout: &str) -> Option<TriggeredRule> {
    let lines = normalize_newlines(binwalk_stdout.trim()).lines().count();
    if lines <= BINWALK_LINE_THRESHOLD {
        return None;
    }

    let line_points = u32::try_from(lines).unwrap_or(u32::MAX);
    let points = BINWALK_BASE_POINTS
        .saturating_add(line_points)
        .min(BINWALK_MAX_POINTS);

    Some(TriggeredRule::new(
        RuleId::REmb01,
        points,
        "Embedded data detected by binwalk",
        json!({ "lines": lines }),
    ))
}

/// Any stderr from `ffprobe` (R-MED-01).
///
/// Content is not inspected, so a misconfigured ffprobe scores the same as a
/// malformed container.
pub fn media_parse_errors(ffprobe_stderr: &str) -> Option<TriggeredRule> {
    if ffprobe_stderr.is_empty() {
        return None;
    }
    Some(TriggeredRule::new(
        RuleId::RMed01,
        10,
        "Media parsing errors detected",
        json!({ "stderr_chars": ffprobe_stderr.chars().count() }),
    ))
}

/// Case-sensitive "ELF" in `readelf -h` output (R-BIN-03).
pub fn readelf_header(readelf_stdout: &str) -> Option<TriggeredRule> {
    if !readelf_stdout.contains("ELF") {
        return None;
    }
    Some(TriggeredRule::new(
        RuleId::RBin03,
        25,
        "ELF header confirmed by readelf",
        json!({ "marker": "ELF" }),
    ))
}
