//! Shell-free execution of a single analyzer.
//!
//! The resolved argv goes straight to `execve` via `tokio::process`; nothing
//! in the artifact path or the tool output is ever interpreted by a shell.
//! Each run is bounded by a timeout, after which the child is killed and
//! whatever it printed is discarded.

use std::ffi::OsString;
use std::io;
use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tracing::{debug, warn};

use crate::tools::outcome::{FailureKind, ToolOutcome, ToolRun, normalize_newlines};
use crate::tools::registry::ToolSpec;

/// Per-tool timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 25;

/// Runs tool specs against an artifact with a fixed timeout.
#[derive(Debug, Clone, Copy)]
pub struct Invoker {
    timeout: Duration,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl Invoker {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn run(&self, spec: &ToolSpec, path: &Path) -> ToolOutcome {
        run(spec, path, self.timeout).await
    }
}

/// Invokes `spec` on `path`, waiting at most `timeout`.
///
/// Never fails: every fault is folded into a `ToolOutcome::Failed`.
pub async fn run(spec: &ToolSpec, path: &Path, timeout: Duration) -> ToolOutcome {
    let argv = spec.resolve(path);
    let cmd = display_command(&argv);

    let Some((program, args)) = argv.split_first() else {
        return ToolOutcome::failed(FailureKind::OtherExecutionError, "empty argument template");
    };

    debug!(tool = spec.name(), %cmd, "invoking tool");
    let started = Instant::now();

    let spawned = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn();

    let child = match spawned {
        Ok(child) => child,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!(tool = spec.name(), program = spec.program(), "tool binary not found");
            return ToolOutcome::failed(
                FailureKind::ToolUnavailable,
                format!("{}: {err}", spec.program()),
            );
        }
        Err(err) => {
            warn!(tool = spec.name(), error = %err, "failed to start tool");
            return ToolOutcome::failed(FailureKind::OtherExecutionError, err.to_string());
        }
    };

    // Dropping the wait future on timeout drops the child, which kills it
    // and closes its pipes.
    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(err)) => {
            warn!(tool = spec.name(), error = %err, "failed to collect tool output");
            return ToolOutcome::failed(FailureKind::OtherExecutionError, err.to_string());
        }
        Err(_) => {
            warn!(
                tool = spec.name(),
                timeout_secs = timeout.as_secs_f64(),
                "tool timed out"
            );
            return ToolOutcome::failed(
                FailureKind::Timeout,
                format!("timed out after {:.1}s", timeout.as_secs_f64()),
            );
        }
    };

    let elapsed = started.elapsed().as_secs_f64();
    let returncode = output.status.code().unwrap_or(-1);
    debug!(tool = spec.name(), returncode, elapsed, "tool finished");

    ToolOutcome::Completed(ToolRun {
        cmd,
        returncode,
        stdout: normalize_newlines(String::from_utf8_lossy(&output.stdout).trim()),
        stderr: normalize_newlines(String::from_utf8_lossy(&output.stderr).trim()),
        elapsed,
    })
}

/// Renders an argv as a copy-pasteable POSIX command line.
///
/// Display only; the harness never hands this string to a shell.
pub fn display_command(argv: &[OsString]) -> String {
    argv.iter()
        .map(|arg| quote_for_display(&arg.to_string_lossy()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn quote_for_display(token: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "@%+=:,./_-".contains(c);
    if token.is_empty() {
        "''".to_string()
    } else if token.chars().all(safe) {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', r#"'"'"'"#))
    }
}
