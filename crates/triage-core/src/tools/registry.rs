//! Static table of external analyzers.
//!
//! A `ToolRegistry` maps a tool identifier to the argument template used to
//! invoke it. Templates are plain token lists; exactly one token carries the
//! `{file}` placeholder, which the invoker replaces with the artifact path.
//! Nothing here ever goes through a shell.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

/// Token substituted with the artifact path at invocation time.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Presentation grouping for tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolCategory {
    Image,
    Video,
    Binary,
    Document,
    Network,
}

impl ToolCategory {
    pub const ALL: [ToolCategory; 5] = [
        ToolCategory::Image,
        ToolCategory::Video,
        ToolCategory::Binary,
        ToolCategory::Document,
        ToolCategory::Network,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Image => "image",
            ToolCategory::Video => "video",
            ToolCategory::Binary => "binary",
            ToolCategory::Document => "document",
            ToolCategory::Network => "network",
        }
    }
}

impl fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ToolCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tool category: {s}"))
    }
}

/// One configured analyzer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    name: String,
    args: Vec<String>,
    categories: Vec<ToolCategory>,
}

impl ToolSpec {
    /// Builds a validated spec.
    ///
    /// The template must be non-empty, its first token is the program, and
    /// exactly one later token contains `{file}` exactly once.
    pub fn new<I, S>(name: impl Into<String>, args: I, categories: Vec<ToolCategory>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spec = Self {
            name: name.into(),
            args: args.into_iter().map(Into::into).collect(),
            categories,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| TriageError::InvalidToolTemplate {
            tool: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("tool identifier is empty"));
        }

        let Some((program, rest)) = self.args.split_first() else {
            return Err(invalid("argument template is empty"));
        };
        if program.trim().is_empty() {
            return Err(invalid("program token is empty"));
        }
        if program.contains(FILE_PLACEHOLDER) {
            return Err(invalid("program token cannot contain the file placeholder"));
        }

        let holders: Vec<&String> = rest
            .iter()
            .filter(|t| t.contains(FILE_PLACEHOLDER))
            .collect();
        match holders.as_slice() {
            [] => Err(invalid("template has no {file} placeholder")),
            [token] if token.matches(FILE_PLACEHOLDER).count() == 1 => Ok(()),
            [_] => Err(invalid("placeholder appears more than once in a token")),
            _ => Err(invalid("template has more than one {file} placeholder")),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn categories(&self) -> &[ToolCategory] {
        &self.categories
    }

    pub fn program(&self) -> &str {
        // Validated non-empty on construction.
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Resolves the template into a concrete argv for `path`.
    ///
    /// The path is spliced in as raw OS bytes; no quoting or escaping is
    /// applied because the vector is handed straight to process creation.
    pub fn resolve(&self, path: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|token| match token.split_once(FILE_PLACEHOLDER) {
                Some((prefix, suffix)) => {
                    let mut arg = OsString::from(prefix);
                    arg.push(path.as_os_str());
                    arg.push(suffix);
                    arg
                }
                None => OsString::from(token),
            })
            .collect()
    }
}

/// Immutable lookup table of tool specs, keyed by identifier.
///
/// Built once at startup and shared read-only across analyses.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: IndexMap<String, ToolSpec>,
    /// Members of each category in presentation order.
    groups: IndexMap<ToolCategory, Vec<String>>,
}

impl ToolRegistry {
    /// Builds a registry; a later spec with the same name replaces the
    /// earlier one in place.
    pub fn new(specs: impl IntoIterator<Item = ToolSpec>) -> Self {
        Self::default().with_tools(specs)
    }

    /// Returns a registry with `specs` added or overriding existing entries.
    /// A tool joining a category is appended to it; one already listed
    /// keeps its place.
    pub fn with_tools(mut self, specs: impl IntoIterator<Item = ToolSpec>) -> Self {
        for spec in specs {
            self.insert(spec);
        }
        self
    }

    fn insert(&mut self, spec: ToolSpec) {
        for (category, members) in self.groups.iter_mut() {
            if !spec.categories.contains(category) {
                members.retain(|member| *member != spec.name);
            }
        }
        for category in &spec.categories {
            let members = self.groups.entry(*category).or_default();
            if !members.contains(&spec.name) {
                members.push(spec.name.clone());
            }
        }
        self.tools.insert(spec.name.clone(), spec);
    }

    pub fn lookup(&self, id: &str) -> Option<&ToolSpec> {
        self.tools.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tools.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ToolSpec> {
        self.tools.values()
    }

    /// Tools tagged with `category`, in the category's own order.
    pub fn in_category(&self, category: ToolCategory) -> Vec<&ToolSpec> {
        self.groups
            .get(&category)
            .map(|members| members.iter().filter_map(|m| self.tools.get(m)).collect())
            .unwrap_or_default()
    }
}

const DEFAULT_TOOLS: &[(&str, &[&str])] = &[
    ("exiftool", &["exiftool", "{file}"]),
    ("exiv2", &["exiv2", "{file}"]),
    ("identify", &["identify", "-verbose", "{file}"]),
    ("mat2", &["mat2", "{file}"]),
    ("strings", &["strings", "-a", "{file}"]),
    ("binwalk", &["binwalk", "{file}"]),
    (
        "ffprobe",
        &[
            "ffprobe",
            "-v",
            "error",
            "-show_format",
            "-show_streams",
            "-print_format",
            "json",
            "{file}",
        ],
    ),
    ("mediainfo", &["mediainfo", "{file}"]),
    ("readelf", &["readelf", "-h", "{file}"]),
    ("objdump", &["objdump", "-f", "{file}"]),
    ("rabin2", &["rabin2", "-I", "{file}"]),
    ("file", &["file", "-k", "{file}"]),
    ("pdfinfo", &["pdfinfo", "{file}"]),
    ("pdfimages", &["pdfimages", "-list", "{file}"]),
    ("docx2txt", &["docx2txt", "{file}", "-"]),
    ("qpdf", &["qpdf", "--show-encryption", "{file}"]),
    ("mutool", &["mutool", "info", "{file}"]),
    ("tshark", &["tshark", "-r", "{file}"]),
];

/// Stock category membership. Order within a group is presentation order.
const DEFAULT_GROUPS: &[(ToolCategory, &[&str])] = &[
    (
        ToolCategory::Image,
        &["exiftool", "exiv2", "identify", "mat2", "strings", "binwalk"],
    ),
    (ToolCategory::Video, &["ffprobe", "mediainfo"]),
    (
        ToolCategory::Binary,
        &["readelf", "objdump", "rabin2", "strings", "file"],
    ),
    (
        ToolCategory::Document,
        &["pdfinfo", "pdfimages", "docx2txt", "qpdf", "mutool"],
    ),
    (ToolCategory::Network, &["tshark"]),
];

/// The stock analyzer table.
///
/// Every entry is a read-only inspector; none of them executes the artifact.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    for (category, members) in DEFAULT_GROUPS {
        registry
            .groups
            .insert(*category, members.iter().map(|m| (*m).to_string()).collect());
    }

    registry.with_tools(DEFAULT_TOOLS.iter().map(|(name, args)| ToolSpec {
        name: (*name).to_string(),
        args: args.iter().map(|a| (*a).to_string()).collect(),
        categories: DEFAULT_GROUPS
            .iter()
            .filter(|(_, members)| members.contains(name))
            .map(|(category, _)| *category)
            .collect(),
    }))
}
