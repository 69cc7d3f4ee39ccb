use serde::{Deserialize, Serialize};

/// Tool identifiers the scoring rules read from. These must match the keys
/// used in the registry.
pub mod tool_ids {
    pub const FILE: &str = "file";
    pub const STRINGS: &str = "strings";
    pub const BINWALK: &str = "binwalk";
    pub const FFPROBE: &str = "ffprobe";
    pub const READELF: &str = "readelf";
}

/// Stable identifiers for scoring rules, listed in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RuleId {
    #[serde(rename = "R-SIG-01")]
    RSig01,
    #[serde(rename = "R-SIG-02")]
    RSig02,
    #[serde(rename = "R-SIG-03")]
    RSig03,
    #[serde(rename = "R-BIN-01")]
    RBin01,
    #[serde(rename = "R-BIN-02")]
    RBin02,
    #[serde(rename = "R-STR-01")]
    RStr01,
    #[serde(rename = "R-EMB-01")]
    REmb01,
    #[serde(rename = "R-MED-01")]
    RMed01,
    #[serde(rename = "R-BIN-03")]
    RBin03,
}

impl RuleId {
    pub const ALL: [RuleId; 9] = [
        RuleId::RSig01,
        RuleId::RSig02,
        RuleId::RSig03,
        RuleId::RBin01,
        RuleId::RBin02,
        RuleId::RStr01,
        RuleId::REmb01,
        RuleId::RMed01,
        RuleId::RBin03,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::RSig01 => "R-SIG-01",
            RuleId::RSig02 => "R-SIG-02",
            RuleId::RSig03 => "R-SIG-03",
            RuleId::RBin01 => "R-BIN-01",
            RuleId::RBin02 => "R-BIN-02",
            RuleId::RStr01 => "R-STR-01",
            RuleId::REmb01 => "R-EMB-01",
            RuleId::RMed01 => "R-MED-01",
            RuleId::RBin03 => "R-BIN-03",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            RuleId::RSig01 => "JPEG signature with foreign extension",
            RuleId::RSig02 => "PNG signature with foreign extension",
            RuleId::RSig03 => "PDF signature with foreign extension",
            RuleId::RBin01 => "Embedded PE header in leading strings",
            RuleId::RBin02 => "Embedded ELF marker in leading strings",
            RuleId::RStr01 => "Sensitive keyword in strings",
            RuleId::REmb01 => "Embedded data signatures",
            RuleId::RMed01 => "Media parser errors",
            RuleId::RBin03 => "ELF header confirmed",
        }
    }

    /// The tool whose output this rule reads.
    pub fn source_tool(&self) -> &'static str {
        match self {
            RuleId::RSig01 | RuleId::RSig02 | RuleId::RSig03 => tool_ids::FILE,
            RuleId::RBin01 | RuleId::RBin02 | RuleId::RStr01 => tool_ids::STRINGS,
            RuleId::REmb01 => tool_ids::BINWALK,
            RuleId::RMed01 => tool_ids::FFPROBE,
            RuleId::RBin03 => tool_ids::READELF,
        }
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::default_registry;

    #[test]
    fn serialized_id_matches_display() {
        for id in RuleId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json.trim_matches('"'), id.as_str());
        }
    }

    #[test]
    fn every_source_tool_is_registered() {
        let registry = default_registry();
        for id in RuleId::ALL {
            assert!(
                registry.contains(id.source_tool()),
                "{id} reads unregistered tool {}",
                id.source_tool()
            );
        }
    }
}
