//! Tracing setup.

use tracing_subscriber::EnvFilter;

/// Installs the global subscriber, logging to stderr.
///
/// `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // Ignore the error from a second initialization, e.g. in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
