//! Tracing subscriber setup
//!
//! Logs go to stderr so table output on stdout stays pipeable.

use anyhow::Result;
use chapter_core::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Build the filter: `RUST_LOG` wins over the configured directive
#[must_use]
pub fn env_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter))
}

/// Install the global subscriber
///
/// `force_json` selects the JSON formatter regardless of `logging.json`.
///
/// # Errors
/// Fails if a global subscriber is already installed.
pub fn init(logging: &LoggingConfig, force_json: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(logging))
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = if force_json || logging.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|err| anyhow::anyhow!("failed to install tracing subscriber: {err}"))
}
