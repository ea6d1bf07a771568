//! Structured logging with environment variable configuration.
//!
//! Logs go to stderr so stdout carries only command results. Records the
//! library emits through the `log` facade are bridged into the same
//! subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::CliConfig;

fn filter_from_config(config: &CliConfig) -> EnvFilter {
    EnvFilter::new(config.log_level.as_filter_str())
}

/// Initialise the logging subsystem based on configuration.
///
/// Log level precedence (highest to lowest):
///
/// 1. CLI `--log-level` (parsed into `config.log_level`)
/// 2. `SCOPE_MATCH_LOG_LEVEL` (parsed into `config.log_level`)
/// 3. Default configuration value
///
/// If a global subscriber is already set, this function silently ignores
/// the error.
pub fn init_logging(config: &CliConfig) {
    // First subscriber wins.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_from_config(config))
        .with_writer(std::io::stderr)
        .with_target(true)
        .without_time()
        .try_init();
}
