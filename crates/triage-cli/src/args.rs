use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use triage_core::tools::ToolCategory;

#[derive(Debug, Parser)]
#[command(
    name = "triage",
    version,
    about = "Run read-only inspection tools on an artifact and score how suspicious it looks"
)]
pub struct Args {
    /// Path to the artifact to inspect
    #[arg(required_unless_present = "list_tools")]
    pub artifact: Option<PathBuf>,

    /// Display name used by the extension checks (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Tool to run; may be repeated
    #[arg(long = "tool", value_name = "ID")]
    pub tools: Vec<String>,

    /// Run every tool in a category; may be repeated
    #[arg(long = "category", value_name = "CATEGORY")]
    pub categories: Vec<ToolCategory>,

    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// TOML file overriding the timeout, default selection or tool templates
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Per-tool timeout in seconds
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// List configured tools by category and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Log tool invocations to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
}
