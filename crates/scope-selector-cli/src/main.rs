//! `scope-match`: check, match and resolve scope selectors from the shell.
//!
//! Exit codes: 0 on success, 1 when a selector fails `check` or nothing
//! matches, 2 for configuration, argument or output errors.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use eyre::{Context, Result};
use tracing::debug;

use scope_selector_cli::commands::{self, Outcome, RuleArg};
use scope_selector_cli::config::{CliConfig, LogLevel, OutputFormat};
use scope_selector_cli::error::CliError;
use scope_selector_cli::logging::init_logging;
use scope_selector_cli::output;

/// Check, match and resolve TextMate-style scope selectors.
#[derive(Parser, Debug)]
#[command(name = "scope-match", version, about)]
struct Cli {
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    /// Output format (text, json).
    #[arg(long, global = true)]
    format: Option<OutputFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse selectors and print their canonical form.
    Check {
        /// Selectors to check.
        #[arg(required = true, allow_hyphen_values = true)]
        selectors: Vec<String>,
    },
    /// Evaluate one selector against a scope path.
    Match {
        /// Selector to evaluate.
        #[arg(allow_hyphen_values = true)]
        selector: String,
        /// Space-separated scope names, outermost first.
        #[arg(long)]
        path: String,
    },
    /// Pick the winning rule for a scope path.
    Resolve {
        /// Rule as SELECTOR=VALUE; later rules win ties.
        #[arg(long = "rule", required = true, allow_hyphen_values = true)]
        rules: Vec<RuleArg>,
        /// Space-separated scope names, outermost first.
        #[arg(long)]
        path: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&CliConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::from(2);
        }
    };
    init_logging(&config);
    debug!(version = env!("CARGO_PKG_VERSION"), format = %config.format, "starting scope-match");

    let mut stdout = io::stdout().lock();
    match run(cli.command, config.format, &mut stdout) {
        Ok(outcome) => ExitCode::from(outcome.exit_code()),
        Err(e) => {
            let message = format!("{e:#}");
            tracing::error!(error = %message, "scope-match failed");
            ExitCode::from(2)
        }
    }
}

fn build_config(cli: &Cli) -> Result<CliConfig, CliError> {
    let config = CliConfig::from_env()?;
    Ok(config.apply_overrides(cli.log_level, cli.format))
}

fn run(command: Command, format: OutputFormat, out: &mut dyn Write) -> Result<Outcome> {
    let outcome = match command {
        Command::Check { selectors } => {
            let reports = commands::check(&selectors);
            output::write_check(out, &reports, format)?;
            commands::check_outcome(&reports)
        }
        Command::Match { selector, path } => {
            let report = commands::match_selector(&selector, &path)?;
            output::write_match(out, &report, format)?;
            report.outcome()
        }
        Command::Resolve { rules, path } => {
            let report = commands::resolve_rules(&rules, &path);
            output::write_resolve(out, &report, format)?;
            report.outcome()
        }
    };
    out.flush().wrap_err("failed to flush stdout")?;
    Ok(outcome)
}
