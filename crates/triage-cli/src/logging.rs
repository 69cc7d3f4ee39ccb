use tracing_subscriber::EnvFilter;

/// Installs a stderr subscriber. `RUST_LOG` wins unless `--verbose` is set;
/// the fallback level is `warn` so stdout stays clean for the report.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
