//! The `check`, `match` and `resolve` commands.
//!
//! Each command turns its arguments into a serialisable report; rendering
//! lives in [`crate::output`].

use std::fmt;
use std::str::FromStr;

use scope_selector::{ParseError, RuleTable, ScopePath, Selector, SelectorCache, Specificity};
use serde::Serialize;
use tracing::debug;

use crate::error::CliError;

/// Whether a command answered its question positively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every selector parsed, or the path matched.
    Success,
    /// The command ran but a selector failed or nothing matched.
    Failure,
}

impl Outcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
        }
    }

    const fn from_bool(success: bool) -> Self {
        if success { Self::Success } else { Self::Failure }
    }
}

/// A [`Specificity`] with its packed scalar alongside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SpecificityReport {
    /// Literal segments matched.
    pub segments: u32,
    /// One-based depth of the deepest matched entry.
    pub depth: u32,
    /// Path entries skipped between descendant anchors.
    pub skipped: u32,
    /// Negations that held.
    pub negations: u32,
    /// Order-preserving scalar form.
    pub scalar: u64,
}

impl From<Specificity> for SpecificityReport {
    fn from(specificity: Specificity) -> Self {
        Self {
            segments: specificity.segments,
            depth: specificity.depth,
            skipped: specificity.skipped,
            negations: specificity.negations,
            scalar: specificity.as_scalar(),
        }
    }
}

impl fmt::Display for SpecificityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "segments {}, depth {}, skipped {}, negations {}",
            self.segments, self.depth, self.skipped, self.negations
        )
    }
}

/// Where and why a selector failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseFailure {
    /// Zero-based byte offset of the problem.
    pub offset: usize,
    /// What went wrong.
    pub message: String,
}

impl From<&ParseError> for ParseFailure {
    fn from(error: &ParseError) -> Self {
        Self {
            offset: error.offset,
            message: error.kind.to_string(),
        }
    }
}

/// Result of checking one selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    /// The selector as supplied.
    pub selector: String,
    /// Canonical rendering when the selector parsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub canonical: Option<String>,
    /// Parse failure otherwise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ParseFailure>,
}

impl CheckReport {
    /// Whether the selector parsed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse every selector and report its canonical form or its error.
pub fn check<S: AsRef<str>>(selectors: &[S]) -> Vec<CheckReport> {
    selectors
        .iter()
        .map(|text| {
            let text = text.as_ref();
            match Selector::parse(text) {
                Ok(selector) => CheckReport {
                    selector: text.to_owned(),
                    canonical: Some(selector.canonical()),
                    error: None,
                },
                Err(error) => {
                    debug!(selector = text, %error, "selector rejected");
                    CheckReport {
                        selector: text.to_owned(),
                        canonical: None,
                        error: Some(ParseFailure::from(&error)),
                    }
                }
            }
        })
        .collect()
}

/// Overall outcome of a batch of checks.
#[must_use]
pub fn check_outcome(reports: &[CheckReport]) -> Outcome {
    Outcome::from_bool(reports.iter().all(CheckReport::is_ok))
}

/// Result of evaluating one selector against one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchReport {
    /// The selector as supplied.
    pub selector: String,
    /// Scope names, outermost first.
    pub path: Vec<String>,
    /// Whether the selector matched.
    pub matched: bool,
    /// Specificity of the match, when there was one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specificity: Option<SpecificityReport>,
}

impl MatchReport {
    /// [`Outcome::Success`] when the selector matched.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        Outcome::from_bool(self.matched)
    }
}

fn path_names(path: &ScopePath) -> Vec<String> {
    path.iter().map(|name| name.as_str().to_owned()).collect()
}

/// Evaluate `selector` against the space-separated scope path `path`.
///
/// # Errors
///
/// Returns [`CliError::Selector`] when `selector` does not parse.
pub fn match_selector(selector: &str, path: &str) -> Result<MatchReport, CliError> {
    let compiled = Selector::parse(selector).map_err(|source| CliError::Selector {
        text: selector.to_owned(),
        source,
    })?;
    let path = ScopePath::from_space_separated(path);
    let result = compiled.matches(&path);
    debug!(selector, path = %path, matched = result.matched, "evaluated selector");
    Ok(MatchReport {
        selector: selector.to_owned(),
        path: path_names(&path),
        matched: result.matched,
        specificity: result.matched.then(|| result.specificity.into()),
    })
}

/// A `--rule` argument: selector text and the value it selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleArg {
    /// Selector text.
    pub selector: String,
    /// Value reported when the rule wins.
    pub value: String,
}

impl FromStr for RuleArg {
    type Err = CliError;

    // Selectors never contain `=`, values may.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (selector, value) = s
            .split_once('=')
            .ok_or_else(|| CliError::MalformedRule(s.to_owned()))?;
        Ok(Self {
            selector: selector.trim().to_owned(),
            value: value.to_owned(),
        })
    }
}

/// The rule that won resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    /// The winning rule's value.
    pub value: String,
    /// The winning rule's selector text.
    pub selector: String,
    /// Zero-based position of the rule on the command line.
    pub rule: usize,
    /// How specifically it matched.
    pub specificity: SpecificityReport,
}

/// A rule left out because its selector did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// Zero-based position of the rule on the command line.
    pub rule: usize,
    /// The selector text as supplied.
    pub selector: String,
    /// Why it was rejected.
    pub error: ParseFailure,
}

/// Result of resolving a rule set against one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    /// Scope names, outermost first.
    pub path: Vec<String>,
    /// The winning rule, if any matched.
    pub winner: Option<Winner>,
    /// Rules skipped because their selectors failed to parse.
    pub rejected: Vec<Rejection>,
}

impl ResolveReport {
    /// [`Outcome::Success`] when some rule won.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        Outcome::from_bool(self.winner.is_some())
    }
}

/// Build a rule table from `rules` and pick the winner for `path`.
///
/// Malformed selectors are reported in [`ResolveReport::rejected`] and
/// skipped; rule positions always refer to the command line.
#[must_use]
pub fn resolve_rules(rules: &[RuleArg], path: &str) -> ResolveReport {
    let cache = SelectorCache::new();
    let sources = rules
        .iter()
        .enumerate()
        .map(|(position, rule)| (rule.selector.as_str(), (position, rule.value.as_str())));
    let (table, rejected) = RuleTable::from_sources_cached(&cache, sources);
    debug!(
        accepted = table.len(),
        rejected = rejected.len(),
        distinct = cache.len(),
        "compiled rule table"
    );

    let path = ScopePath::from_space_separated(path);
    let winner = table.resolve(&path).map(|hit| {
        let (rule, value) = *hit.value;
        Winner {
            value: value.to_owned(),
            selector: hit.selector.as_str().to_owned(),
            rule,
            specificity: hit.specificity.into(),
        }
    });
    ResolveReport {
        path: path_names(&path),
        winner,
        rejected: rejected
            .iter()
            .map(|rejection| Rejection {
                rule: rejection.index,
                selector: rejection.text.clone(),
                error: ParseFailure::from(&rejection.error),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn rules(args: &[&str]) -> Vec<RuleArg> {
        args.iter()
            .map(|arg| match arg.parse() {
                Ok(rule) => rule,
                Err(err) => panic!("{arg:?} should parse: {err}"),
            })
            .collect()
    }

    #[test]
    fn check_reports_canonical_form_and_errors() {
        let reports = check(&["source.js  -comment", "a,"]);
        let [ok, bad] = reports.as_slice() else {
            panic!("expected two reports");
        };
        assert_eq!(ok.canonical.as_deref(), Some("source.js -comment"));
        assert!(ok.is_ok());
        assert_eq!(
            bad.error,
            Some(ParseFailure {
                offset: 1,
                message: "dangling operator ','".to_owned(),
            })
        );
        assert_eq!(check_outcome(&reports), Outcome::Failure);
        assert_eq!(check_outcome(std::slice::from_ref(ok)), Outcome::Success);
    }

    #[test]
    fn match_reports_specificity_only_on_success() {
        let Ok(hit) = match_selector("source.js string", "source.js string.quoted") else {
            panic!("selector should parse");
        };
        assert!(hit.matched);
        assert_eq!(hit.path, ["source.js", "string.quoted"]);
        assert_eq!(hit.specificity.map(|s| (s.segments, s.depth)), Some((3, 2)));
        assert_eq!(hit.outcome(), Outcome::Success);

        let Ok(miss) = match_selector("comment", "source.js string") else {
            panic!("selector should parse");
        };
        assert_eq!(miss.specificity, None);
        assert_eq!(miss.outcome().exit_code(), 1);
    }

    #[test]
    fn match_rejects_malformed_selector() {
        let result = match_selector("(string", "string");
        assert!(matches!(result, Err(CliError::Selector { .. })));
    }

    #[rstest]
    #[case("source.js string=green", "source.js string", "green")]
    #[case(" comment = grey", "comment", " grey")]
    #[case("string=a=b", "string", "a=b")]
    #[case("-comment=", "-comment", "")]
    fn rule_arguments_split_at_first_equals(
        #[case] arg: &str,
        #[case] selector: &str,
        #[case] value: &str,
    ) {
        let rule: Result<RuleArg, _> = arg.parse();
        assert_eq!(
            rule.ok(),
            Some(RuleArg {
                selector: selector.to_owned(),
                value: value.to_owned(),
            })
        );
    }

    #[test]
    fn rule_argument_without_equals_is_malformed() {
        assert!(matches!(
            "source.js".parse::<RuleArg>(),
            Err(CliError::MalformedRule(_))
        ));
    }

    #[test]
    fn resolve_picks_most_specific_rule() {
        let report = resolve_rules(
            &rules(&["source.js=A", "source.js string=B", "source.js comment=C"]),
            "source.js string.quoted",
        );
        let winner = report.winner.as_ref().map(|w| (w.value.as_str(), w.rule));
        assert_eq!(winner, Some(("B", 1)));
        assert_eq!(report.outcome(), Outcome::Success);
    }

    #[test]
    fn resolve_keeps_command_line_positions_past_rejections() {
        let report = resolve_rules(
            &rules(&["(string=broken", "string=first", "string=second"]),
            "source.js string",
        );
        let winner = report.winner.as_ref().map(|w| (w.value.as_str(), w.rule));
        assert_eq!(winner, Some(("second", 2)));
        let rejected: Vec<_> = report.rejected.iter().map(|r| r.rule).collect();
        assert_eq!(rejected, [0]);
    }

    #[test]
    fn resolve_without_match_fails() {
        let report = resolve_rules(&rules(&["comment=grey"]), "source.js string");
        assert_eq!(report.winner, None);
        assert_eq!(report.outcome(), Outcome::Failure);
    }
}
