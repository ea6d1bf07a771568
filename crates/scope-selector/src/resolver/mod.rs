//! Rule tables and resolution of the winning rule for a scope path.
//!
//! A rule pairs a compiled [`Selector`] with a caller value (a theme style, a
//! feature flag, ...). Resolution evaluates every rule against the path and
//! keeps the match with the highest `(specificity, declaration index)`, so
//! among equally specific rules the one declared last wins.

use std::cmp::Reverse;

use thiserror::Error;

use crate::cache::SelectorCache;
use crate::errors::ParseError;
use crate::scope::ScopePath;
use crate::selector::Selector;
use crate::specificity::Specificity;

mod shared;

pub use shared::SharedRuleTable;

/// A selector paired with the value it selects.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule<V> {
    /// Compiled selector.
    pub selector: Selector,
    /// Value returned when the rule wins.
    pub value: V,
}

/// A rule whose selector failed to parse and was left out of a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("rule {index} `{text}` rejected: {error}")]
pub struct RejectedRule {
    /// Declaration index of the rule in the supplied sources.
    pub index: usize,
    /// The selector text as supplied.
    pub text: String,
    /// Why parsing failed.
    #[source]
    pub error: ParseError,
}

/// The winning rule for a path, or one entry of a full ranking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution<'a, V> {
    /// Value of the matching rule.
    pub value: &'a V,
    /// Selector of the matching rule.
    pub selector: &'a Selector,
    /// How specifically the selector matched.
    pub specificity: Specificity,
    /// Declaration index of the rule in its table.
    pub index: usize,
}

impl<V> Resolution<'_, V> {
    const fn rank(&self) -> (Specificity, usize) {
        (self.specificity, self.index)
    }
}

/// An immutable, ordered collection of rules.
///
/// Declaration order is preserved and is the tie-break authority. Only
/// compiled selectors can be stored, so a table never holds a malformed
/// rule. Replacing rules means building a new table; see
/// [`SharedRuleTable`] for swapping tables under concurrent readers.
///
/// # Examples
/// ```
/// use scope_selector::{RuleTable, ScopePath};
///
/// let (table, rejected) = RuleTable::from_sources([
///     ("source.js", "A"),
///     ("source.js string", "B"),
///     ("source.js comment", "C"),
/// ]);
/// assert!(rejected.is_empty());
/// let path = ScopePath::from(["source.js", "string.quoted"]);
/// assert_eq!(table.resolve(&path).map(|hit| *hit.value), Some("B"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable<V> {
    rules: Vec<Rule<V>>,
}

impl<V> Default for RuleTable<V> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<V> RuleTable<V> {
    /// Build a table from compiled selectors in declaration order.
    pub fn new(rules: impl IntoIterator<Item = (Selector, V)>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .map(|(selector, value)| Rule { selector, value })
                .collect(),
        }
    }

    /// Build a table from selector text, compiling each rule.
    ///
    /// A selector that fails to parse is logged, reported in the returned
    /// list and skipped; the remaining rules keep their relative order.
    /// Declaration indices in the table count accepted rules only.
    pub fn from_sources<S: AsRef<str>>(
        sources: impl IntoIterator<Item = (S, V)>,
    ) -> (Self, Vec<RejectedRule>) {
        Self::compile_sources(sources, Selector::parse)
    }

    /// Like [`from_sources`](Self::from_sources), but compiles through
    /// `cache` so repeated selector strings are parsed once.
    pub fn from_sources_cached<S: AsRef<str>>(
        cache: &SelectorCache,
        sources: impl IntoIterator<Item = (S, V)>,
    ) -> (Self, Vec<RejectedRule>) {
        Self::compile_sources(sources, |text| cache.get_or_parse(text))
    }

    fn compile_sources<S, F>(
        sources: impl IntoIterator<Item = (S, V)>,
        mut compile: F,
    ) -> (Self, Vec<RejectedRule>)
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Result<Selector, ParseError>,
    {
        let mut rules = Vec::new();
        let mut rejected = Vec::new();
        for (index, (text, value)) in sources.into_iter().enumerate() {
            let text = text.as_ref();
            match compile(text) {
                Ok(selector) => rules.push(Rule { selector, value }),
                Err(error) => {
                    let rule = RejectedRule {
                        index,
                        text: text.to_owned(),
                        error,
                    };
                    log::warn!("{rule}");
                    rejected.push(rule);
                }
            }
        }
        (Self { rules }, rejected)
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the table holds no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in declaration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Rule<V>> {
        self.rules.iter()
    }

    fn candidates<'a, 'p>(
        &'a self,
        path: &'p ScopePath,
    ) -> impl Iterator<Item = Resolution<'a, V>> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(move |(index, rule)| {
                let result = rule.selector.matches(path);
                log::trace!(
                    "rule {index} `{}` against `{path}`: matched={} {:?}",
                    rule.selector,
                    result.matched,
                    result.specificity
                );
                result.matched.then_some(Resolution {
                    value: &rule.value,
                    selector: &rule.selector,
                    specificity: result.specificity,
                    index,
                })
            })
    }

    /// Find the winning rule for `path`.
    ///
    /// Returns `None` when no rule matches. Otherwise the rule with the
    /// highest specificity wins; among equally specific rules the one
    /// declared last wins.
    #[must_use]
    pub fn resolve(&self, path: &ScopePath) -> Option<Resolution<'_, V>> {
        let winner = self.candidates(path).max_by_key(Resolution::rank);
        match &winner {
            Some(hit) => log::debug!(
                "`{path}` resolved to rule {} `{}`",
                hit.index,
                hit.selector
            ),
            None => log::debug!("`{path}` matched no rule"),
        }
        winner
    }

    /// Every rule matching `path`, best first.
    ///
    /// The first entry, when present, is the one [`resolve`](Self::resolve)
    /// returns. Callers that merge rule values (for example a theme where a
    /// less specific rule supplies the font style and a more specific one the
    /// colour) walk the whole ranking.
    #[must_use]
    pub fn matching(&self, path: &ScopePath) -> Vec<Resolution<'_, V>> {
        let mut ranked: Vec<_> = self.candidates(path).collect();
        ranked.sort_by_key(|hit| Reverse(hit.rank()));
        ranked
    }
}

impl<V> FromIterator<(Selector, V)> for RuleTable<V> {
    fn from_iter<I: IntoIterator<Item = (Selector, V)>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl<'a, V> IntoIterator for &'a RuleTable<V> {
    type Item = &'a Rule<V>;
    type IntoIter = std::slice::Iter<'a, Rule<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Resolve the winning value among `rules` for `path`.
///
/// `rules` is in declaration order; ties in specificity go to the rule
/// declared later.
///
/// # Examples
/// ```
/// use scope_selector::{ScopePath, Selector, resolve};
/// let parse = |text| Selector::parse(text).unwrap_or_else(|e| panic!("{e}"));
/// let rules = [
///     (parse("text.html"), "A"),
///     (parse("text.html -source.js"), "B"),
/// ];
/// let path = ScopePath::from(["text.html", "source.js"]);
/// assert_eq!(resolve(&rules, &path).map(|(value, _)| *value), Some("A"));
/// ```
#[must_use]
pub fn resolve<'a, V>(
    rules: &'a [(Selector, V)],
    path: &ScopePath,
) -> Option<(&'a V, Specificity)> {
    rules
        .iter()
        .enumerate()
        .filter_map(|(index, (selector, value))| {
            let result = selector.matches(path);
            result
                .matched
                .then_some((result.specificity, index, value))
        })
        .max_by_key(|&(specificity, index, _)| (specificity, index))
        .map(|(specificity, _, value)| (value, specificity))
}
