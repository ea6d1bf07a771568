//! Rendering of command reports as text or JSON.

use std::io::Write;

use eyre::{Context, Result};
use serde::Serialize;

use crate::commands::{CheckReport, MatchReport, ParseFailure, ResolveReport};
use crate::config::OutputFormat;

fn write_json<T: Serialize + ?Sized>(writer: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value).wrap_err("failed to encode JSON report")?;
    writeln!(writer).wrap_err("failed to terminate JSON report")
}

/// Column of byte `offset` in `text`, counted in characters.
fn caret_column(text: &str, offset: usize) -> usize {
    text.get(..offset)
        .map_or(offset, |prefix| prefix.chars().count())
}

fn write_failure(writer: &mut dyn Write, selector: &str, failure: &ParseFailure) -> Result<()> {
    let column = caret_column(selector, failure.offset);
    writeln!(
        writer,
        "error: {} at byte {}\n  {selector}\n  {:>width$}",
        failure.message,
        failure.offset,
        "^",
        width = column + 1
    )
    .wrap_err_with(|| format!("failed to write parse error for `{selector}`"))
}

/// Write `check` results: canonical forms, or errors with a caret under the
/// offending position.
///
/// # Errors
///
/// Returns an error when writing or encoding fails.
pub fn write_check(
    writer: &mut dyn Write,
    reports: &[CheckReport],
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(writer, reports);
    }
    for report in reports {
        match (&report.canonical, &report.error) {
            (_, Some(failure)) => write_failure(writer, &report.selector, failure)?,
            (Some(canonical), None) => writeln!(writer, "ok: {canonical}")
                .wrap_err_with(|| format!("failed to write check result for `{canonical}`"))?,
            (None, None) => {}
        }
    }
    Ok(())
}

/// Write a `match` result.
///
/// # Errors
///
/// Returns an error when writing or encoding fails.
pub fn write_match(writer: &mut dyn Write, report: &MatchReport, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(writer, report);
    }
    let written = match &report.specificity {
        Some(specificity) => writeln!(writer, "matched ({specificity})"),
        None => writeln!(writer, "no match"),
    };
    written.wrap_err("failed to write match result")
}

/// Write a `resolve` result: the winning value, then any skipped rules.
///
/// # Errors
///
/// Returns an error when writing or encoding fails.
pub fn write_resolve(
    writer: &mut dyn Write,
    report: &ResolveReport,
    format: OutputFormat,
) -> Result<()> {
    if format == OutputFormat::Json {
        return write_json(writer, report);
    }
    let written = match &report.winner {
        Some(winner) => writeln!(
            writer,
            "{}\n  rule {} `{}` ({})",
            winner.value, winner.rule, winner.selector, winner.specificity
        ),
        None => writeln!(writer, "no match"),
    };
    written.wrap_err("failed to write resolution")?;
    for rejection in &report.rejected {
        writeln!(
            writer,
            "skipped rule {} `{}`: {} at byte {}",
            rejection.rule, rejection.selector, rejection.error.message, rejection.error.offset
        )
        .wrap_err_with(|| format!("failed to write rejected rule {}", rejection.rule))?;
    }
    Ok(())
}
