/// Logging setup for the tide report binaries.
///
/// Report text goes to stdout; diagnostics go through `tracing` to stderr so
/// the two never interleave in a redirected report. `RUST_LOG` overrides the
/// level chosen here.

use std::io;

use tracing_subscriber::EnvFilter;

/// Default filter directive for a given verbosity flag.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "info" }
}

/// Installs the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
