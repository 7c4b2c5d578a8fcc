//! Logging setup for the command line tool
//!
//! Logs go to stderr so stdout only carries JSON output.

use tracing_subscriber::EnvFilter;

/// Default filter when RUST_LOG is not set
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else if cfg!(debug_assertions) {
        "info,track_gates_lib=debug"
    } else {
        "info"
    }
}

/// Install the global fmt subscriber
///
/// RUST_LOG takes precedence over the `--verbose` flag.
pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}
