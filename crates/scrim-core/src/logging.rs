#![forbid(unsafe_code)]

//! Production logging setup.
//!
//! With the `tracing-json` feature, [`init_json`] installs a global
//! `tracing-subscriber` that writes one JSON object per event. The filter is
//! read from `SCRIM_LOG` (falling back to `RUST_LOG`, then `info`).

use tracing_subscriber::EnvFilter;

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "SCRIM_LOG";

/// Error returned when a global subscriber is already installed.
#[derive(Debug)]
pub struct LoggingInitError(String);

impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to install tracing subscriber: {}", self.0)
    }
}

impl std::error::Error for LoggingInitError {}

/// Build the env filter used by [`init_json`].
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install a JSON-formatting global subscriber.
pub fn init_json() -> Result<(), LoggingInitError> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_target(true)
        .try_init()
        .map_err(|err| LoggingInitError(err.to_string()))
}
