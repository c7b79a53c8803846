//! Tracing setup for the CLI

use tracing_subscriber::EnvFilter;

/// Honors `RUST_LOG`; otherwise warnings only so command output stays
/// clean, or debug with `--verbose`. Diagnostics go to stderr, never
/// stdout.
pub fn init(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
