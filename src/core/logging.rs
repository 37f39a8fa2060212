//! Logging setup
//!
//! Diagnostics go to stderr through `tracing`; stdout carries results only.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Environment variable holding an EnvFilter directive that overrides the flags
pub const LOG_ENV: &str = "VCSURL_LOG";

/// Pick the log level from the quiet/verbose flags
pub fn level_for(quiet: bool, verbose: bool) -> Level {
    if verbose {
        Level::DEBUG
    } else if quiet {
        Level::ERROR
    } else {
        Level::WARN
    }
}

/// Build the filter: `VCSURL_LOG` wins, otherwise the flag-derived level for this crate
pub fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("vcsurl={}", level.as_str().to_lowercase())))
}

/// Install the global subscriber. Safe to call more than once.
pub fn init(quiet: bool, verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level_for(quiet, verbose)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
