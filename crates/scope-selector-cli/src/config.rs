//! Configuration parsed from environment variables.
//!
//! Every setting has an environment variable prefixed with `SCOPE_MATCH_`;
//! command-line flags override them through [`CliConfig::apply_overrides`].

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::CliError;

/// Environment variable selecting the log level.
pub const LOG_LEVEL_VAR: &str = "SCOPE_MATCH_LOG_LEVEL";
/// Environment variable selecting the output format.
pub const FORMAT_VAR: &str = "SCOPE_MATCH_FORMAT";

/// Log level enumeration matching tracing crate levels.
///
/// Defaults to `Warn`, so rejected rules surface without extra flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Per-rule evaluation detail.
    Trace,
    /// Resolution outcomes.
    Debug,
    /// Standard informational messages.
    Info,
    /// Rejected rules and other recoverable problems.
    #[default]
    Warn,
    /// Failures only.
    Error,
}

impl FromStr for LogLevel {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown log level '{s}', expected one of: trace, debug, info, warn, error"
            ))),
        }
    }
}

impl LogLevel {
    /// Convert to a tracing filter directive string.
    #[must_use]
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// How command results are written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable lines.
    #[default]
    Text,
    /// One pretty-printed JSON document per invocation.
    Json,
}

impl FromStr for OutputFormat {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(CliError::InvalidConfig(format!(
                "unknown output format '{s}', expected one of: text, json"
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

/// Configuration for one `scope-match` invocation.
///
/// # Environment Variables
///
/// - `SCOPE_MATCH_LOG_LEVEL`: trace, debug, info, warn or error
/// - `SCOPE_MATCH_FORMAT`: text or json
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: LogLevel,
    /// Output format for command results.
    pub format: OutputFormat,
}

impl CliConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if an environment variable contains
    /// an invalid value.
    pub fn from_env() -> Result<Self, CliError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value. Missing variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns `CliError::InvalidConfig` if a variable holds an invalid
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CliError> {
        let log_level = match lookup(LOG_LEVEL_VAR) {
            Some(val) => val.parse()?,
            None => LogLevel::default(),
        };
        let format = match lookup(FORMAT_VAR) {
            Some(val) => val.parse()?,
            None => OutputFormat::default(),
        };
        Ok(Self { log_level, format })
    }

    /// Apply optional overrides to an existing configuration.
    ///
    /// This is intended for CLI overrides that should take precedence over
    /// environment-based defaults.
    #[must_use]
    pub fn apply_overrides(
        mut self,
        log_level: Option<LogLevel>,
        format: Option<OutputFormat>,
    ) -> Self {
        if let Some(level) = log_level {
            self.log_level = level;
        }
        if let Some(format) = format {
            self.format = format;
        }
        self
    }

    /// Create a new configuration with the specified log level.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| {
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value).to_owned())
        }
    }

    #[rstest]
    #[case("trace", LogLevel::Trace)]
    #[case("debug", LogLevel::Debug)]
    #[case("info", LogLevel::Info)]
    #[case("warn", LogLevel::Warn)]
    #[case("warning", LogLevel::Warn)]
    #[case("error", LogLevel::Error)]
    #[case("TRACE", LogLevel::Trace)]
    #[case("Debug", LogLevel::Debug)]
    fn log_level_parses_valid_values(#[case] text: &str, #[case] expected: LogLevel) {
        assert_eq!(text.parse::<LogLevel>().ok(), Some(expected));
    }

    #[test]
    fn log_level_rejects_invalid_values() {
        let Err(error) = "loud".parse::<LogLevel>() else {
            panic!("`loud` is not a log level");
        };
        assert!(error.to_string().contains("unknown log level 'loud'"));
    }

    #[rstest]
    #[case("text", OutputFormat::Text)]
    #[case("JSON", OutputFormat::Json)]
    fn output_format_parses_valid_values(#[case] text: &str, #[case] expected: OutputFormat) {
        assert_eq!(text.parse::<OutputFormat>().ok(), Some(expected));
        assert_eq!(expected.to_string(), text.to_lowercase());
    }

    #[test]
    fn output_format_rejects_invalid_values() {
        assert!(matches!(
            "yaml".parse::<OutputFormat>(),
            Err(CliError::InvalidConfig(_))
        ));
    }

    #[test]
    fn missing_variables_fall_back_to_defaults() {
        let config = CliConfig::from_lookup(lookup(&[])).ok();
        assert_eq!(config, Some(CliConfig::default()));
        assert_eq!(CliConfig::default().log_level, LogLevel::Warn);
        assert_eq!(CliConfig::default().format, OutputFormat::Text);
    }

    #[test]
    fn variables_override_defaults() {
        let vars = [(LOG_LEVEL_VAR, "debug"), (FORMAT_VAR, "json")];
        let config = CliConfig::from_lookup(lookup(&vars)).ok();
        assert_eq!(
            config,
            Some(CliConfig {
                log_level: LogLevel::Debug,
                format: OutputFormat::Json,
            })
        );
    }

    #[rstest]
    #[case(LOG_LEVEL_VAR, "chatty")]
    #[case(FORMAT_VAR, "xml")]
    fn invalid_variable_is_a_config_error(#[case] name: &str, #[case] value: &str) {
        let vars = [(name, value)];
        let result = CliConfig::from_lookup(lookup(&vars));
        assert!(matches!(result, Err(CliError::InvalidConfig(_))));
    }

    #[test]
    fn apply_overrides_updates_selected_fields() {
        let config =
            CliConfig::default().apply_overrides(Some(LogLevel::Error), Some(OutputFormat::Json));
        assert_eq!(config.log_level, LogLevel::Error);
        assert_eq!(config.format, OutputFormat::Json);

        let config = CliConfig::default()
            .with_log_level(LogLevel::Trace)
            .apply_overrides(None, None);
        assert_eq!(config.log_level, LogLevel::Trace);
        assert_eq!(config.format, OutputFormat::Text);
    }
}
