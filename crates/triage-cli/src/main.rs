use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;

use triage_core::TriageConfig;
use triage_core::report::{model::ToolInfo, render};
use triage_core::tools::{ToolCategory, ToolRegistry};

mod args;
mod logging;

#[tokio::main]
async fn main() -> Result<()> {
    let args = args::Args::parse();
    logging::init(args.verbose);

    let mut config = match &args.config {
        Some(path) => TriageConfig::load(path)
            .context("loading configuration")?,
        None => TriageConfig::default(),
    };
    if let Some(secs) = args.timeout {
        config.timeout = Duration::from_secs(secs);
    }

    if args.list_tools {
        return emit(args.out.as_deref(), &render::render_tool_list(&config.registry));
    }

    let path = args
        .artifact
        .as_deref()
        .context("an artifact path is required")?;
    let filename = args.name.clone().unwrap_or_else(|| display_name(path));
    let requested = selected_tools(&config.registry, &args.tools, &args.categories);
    debug!(file = %filename, tools = ?requested, "tool selection");

    let tool = ToolInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    let report = triage_core::inspect(&config, path, &filename, &requested, tool)
        .await
        .with_context(|| format!("failed to triage {}", path.display()))?;

    let output = match args.format {
        args::OutputFormat::Json => serde_json::to_string_pretty(&report)?,
        args::OutputFormat::Text => render::render_text(&report),
    };
    emit(args.out.as_deref(), &output)?;

    std::process::exit(report.verdict.exit_code());
}

fn emit(out: Option<&Path>, output: &str) -> Result<()> {
    match out {
        Some(path) => std::fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{output}"),
    }
    Ok(())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Explicit tools first, then each category's members, without repeats.
fn selected_tools(
    registry: &ToolRegistry,
    tools: &[String],
    categories: &[ToolCategory],
) -> Vec<String> {
    let mut selected: Vec<String> = Vec::new();
    let from_categories = categories
        .iter()
        .flat_map(|c| registry.in_category(*c))
        .map(|spec| spec.name().to_string());

    for tool in tools.iter().cloned().chain(from_categories) {
        if !selected.contains(&tool) {
            selected.push(tool);
        }
    }
    selected
}
