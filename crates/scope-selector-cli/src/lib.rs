//! Command-line front end for the `scope-selector` engine.
//!
//! The `scope-match` binary exposes three commands:
//!
//! - `check <SELECTOR>...` parses selectors and prints their canonical form,
//!   or the parse error with a caret under the offending position.
//! - `match <SELECTOR> --path <SCOPES>` evaluates one selector against a
//!   space-separated scope path.
//! - `resolve --rule <SELECTOR=VALUE>... --path <SCOPES>` builds a rule table
//!   and prints the winning value.
//!
//! # Configuration
//!
//! - `SCOPE_MATCH_LOG_LEVEL`: log verbosity (trace, debug, info, warn, error)
//! - `SCOPE_MATCH_FORMAT`: output format (text, json)
//!
//! Results go to stdout; logs go to stderr.

pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
