//! Logging setup.
//!
//! verso logs through `tracing`. Libraries only emit events; binaries call
//! [`init`] once to print them.

use tracing_subscriber::EnvFilter;

/// Environment variable that overrides the default filter, e.g. `VERSO_LOG=verso=debug`.
pub const LOG_ENV: &str = "VERSO_LOG";

/// Installs a stderr `fmt` subscriber.
///
/// `default_filter` is used unless [`LOG_ENV`] is set. Calling this when a
/// global subscriber already exists does nothing.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
