//! Diagnostics for the informer tooling itself.
//!
//! The facade never installs a global subscriber; binaries that want to see
//! what the library is doing (config loading, engine installation) call
//! [`init`] once. Output goes to stderr so it never mixes with records the
//! console sink writes to stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable overriding the diagnostics filter
pub const ENV_VAR: &str = "INFORMER_LOG";

/// Initialize diagnostics at `warn`, overridable with `INFORMER_LOG`
pub fn init() {
    init_with_level("warn")
}

/// Initialize diagnostics with a specific default level
///
/// # Arguments
/// * `default_level` - Default filter directive (debug, info, warn, error)
///
/// This can still be overridden by the `INFORMER_LOG` environment variable.
/// Calling it twice is harmless; the second call is ignored.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_env(ENV_VAR).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .try_init();
}

/// Initialize diagnostics for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
