//! Triage configuration.
//!
//! Defaults reproduce the stock setup: a 25 second per-tool timeout, the
//! `file`/`strings`/`exiftool` selection when nothing is requested, and the
//! built-in analyzer table. A TOML file may change the timeout and default
//! selection, and add or override tool templates:
//!
//! ```toml
//! timeout_secs = 10
//! default_tools = ["file", "strings"]
//!
//! [tools.yara]
//! args = ["yara", "-s", "/etc/rules.yar", "{file}"]
//! categories = ["binary"]
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, TriageError};
use crate::orchestrate::Orchestrator;
use crate::tools::invoke::DEFAULT_TIMEOUT_SECONDS;
use crate::tools::{Invoker, ToolCategory, ToolRegistry, ToolSpec, default_registry};

/// Tools run when a request names none.
pub const DEFAULT_SELECTION: [&str; 3] = ["file", "strings", "exiftool"];

#[derive(Debug, Clone)]
pub struct TriageConfig {
    /// Upper bound on each tool's wall-clock time.
    pub timeout: Duration,
    pub default_tools: Vec<String>,
    /// Built once, shared read-only by every analysis.
    pub registry: Arc<ToolRegistry>,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            default_tools: DEFAULT_SELECTION.iter().map(|t| t.to_string()).collect(),
            registry: Arc::new(default_registry()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    timeout_secs: Option<u64>,
    default_tools: Option<Vec<String>>,
    #[serde(default)]
    tools: IndexMap<String, ToolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolEntry {
    args: Vec<String>,
    #[serde(default)]
    categories: Vec<ToolCategory>,
}

impl TriageConfig {
    /// Loads defaults overlaid with the TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| TriageError::Config {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_toml(&text, path)
    }

    /// Parses TOML `text`; `origin` only labels errors.
    pub fn from_toml(text: &str, origin: &Path) -> Result<Self> {
        let config_error = |message: String| TriageError::Config {
            path: origin.to_path_buf(),
            message,
        };

        let file: ConfigFile = toml::from_str(text).map_err(|err| config_error(err.to_string()))?;

        let mut config = Self::default();

        if let Some(secs) = file.timeout_secs {
            if secs == 0 {
                return Err(config_error("timeout_secs must be greater than zero".into()));
            }
            config.timeout = Duration::from_secs(secs);
        }

        if let Some(tools) = file.default_tools {
            config.default_tools = tools;
        }

        let specs = file
            .tools
            .into_iter()
            .map(|(name, entry)| ToolSpec::new(name, entry.args, entry.categories))
            .collect::<Result<Vec<_>>>()?;
        config.registry = Arc::new(default_registry().with_tools(specs));

        Ok(config)
    }

    /// An orchestrator sharing this config's registry and timeout.
    pub fn orchestrator(&self) -> Orchestrator {
        Orchestrator::new(Arc::clone(&self.registry), Invoker::new(self.timeout))
    }

    /// The tools to run for `requested`, falling back to the default
    /// selection when the request is empty.
    pub fn selection(&self, requested: &[String]) -> Vec<String> {
        if requested.is_empty() {
            self.default_tools.clone()
        } else {
            requested.to_vec()
        }
    }
}
