//! Error types for the `scope-match` front end.
//!
//! Selector parse failures are not errors here: `check` and `resolve` report
//! them as results. These variants cover what stops a command from running;
//! output failures travel as `eyre` reports.

use scope_selector::ParseError;
use thiserror::Error;

/// Errors that abort a `scope-match` invocation.
#[derive(Debug, Error)]
pub enum CliError {
    /// An invalid configuration value was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A `--rule` argument lacks the `=` between selector and value.
    #[error("invalid rule `{0}`: expected SELECTOR=VALUE")]
    MalformedRule(String),

    /// The selector given to `match` does not parse.
    #[error("invalid selector `{text}`: {source}")]
    Selector {
        /// The selector text as supplied.
        text: String,
        /// Why parsing failed.
        #[source]
        source: ParseError,
    },
}
