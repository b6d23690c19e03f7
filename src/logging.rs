//! Diagnostic logging via `tracing`
//!
//! Logs go to stderr so stdout can carry key material (`generate --print`)
//! and JSON output untouched.

use tracing_subscriber::EnvFilter;

/// Map the number of `-v` flags to a filter directive
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `verbosity`.
/// Calling this twice is harmless; the second call does nothing.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
