//! Score aggregation and verdict mapping.
//!
//! Points from every triggered rule are summed in evaluation order, the total
//! is capped at `MAX_SCORE`, and the capped score alone decides the verdict:
//!
//!   - score >= 50 → Likely Malicious
//!   - score >= 25 → Possibly Suspicious
//!   - otherwise   → Likely Clean

use serde::{Deserialize, Serialize};

use crate::rules::eval::TriggeredRule;

pub const MAX_SCORE: u32 = 100;
pub const MALICIOUS_THRESHOLD: u32 = 50;
pub const SUSPICIOUS_THRESHOLD: u32 = 25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Verdict {
    #[serde(rename = "Likely Clean")]
    LikelyClean,
    #[serde(rename = "Possibly Suspicious")]
    PossiblySuspicious,
    #[serde(rename = "Likely Malicious")]
    LikelyMalicious,
}

impl Verdict {
    pub fn from_score(score: u32) -> Self {
        if score >= MALICIOUS_THRESHOLD {
            Verdict::LikelyMalicious
        } else if score >= SUSPICIOUS_THRESHOLD {
            Verdict::PossiblySuspicious
        } else {
            Verdict::LikelyClean
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::LikelyClean => "Likely Clean",
            Verdict::PossiblySuspicious => "Possibly Suspicious",
            Verdict::LikelyMalicious => "Likely Malicious",
        }
    }

    /// CI-friendly process exit code: 0 clean, 1 suspicious, 2 malicious.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::LikelyClean => 0,
            Verdict::PossiblySuspicious => 1,
            Verdict::LikelyMalicious => 2,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Score, verdict, and one reason per triggered rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub score: u32,
    pub verdict: Verdict,
    pub reasons: Vec<String>,
}

/// Folds triggered rules into a capped score and verdict.
///
/// Same `triggered` input always yields an identical report; reasons keep
/// the order the rules were triggered in.
pub fn classify(triggered: &[TriggeredRule]) -> ScoreReport {
    let raw = triggered
        .iter()
        .fold(0u32, |total, rule| total.saturating_add(rule.points));
    let score = raw.min(MAX_SCORE);

    ScoreReport {
        score,
        verdict: Verdict::from_score(score),
        reasons: triggered.iter().map(|r| r.reason.clone()).collect(),
    }
}
