//! TextMate-style scope selectors.
//!
//! A scope selector such as `source.js string -comment` decides whether a rule
//! (a theme colour, an editor behaviour, ...) applies at a point in a
//! document, given the [`ScopePath`] of nested scopes enclosing that point.
//! The crate parses selector text into an immutable tree, evaluates it
//! against scope paths, and resolves competing rules by [`Specificity`],
//! letting the later-declared rule win ties.
//!
//! ```
//! use scope_selector::{RuleTable, ScopePath};
//!
//! let (rules, rejected) = RuleTable::from_sources([
//!     ("source.js", "plain"),
//!     ("source.js string", "string"),
//!     ("source.js (string, comment", "broken"),
//! ]);
//! assert_eq!(rejected.len(), 1);
//!
//! let path: ScopePath = "source.js string.quoted.double.js".parse().unwrap_or_default();
//! assert_eq!(rules.resolve(&path).map(|hit| *hit.value), Some("string"));
//! ```

mod cache;
mod errors;
mod matcher;
mod resolver;
mod scope;
mod selector;
mod specificity;

pub use cache::SelectorCache;
pub use errors::{ParseError, ParseErrorKind};
pub use matcher::{MatchResult, evaluate};
pub use resolver::{RejectedRule, Resolution, Rule, RuleTable, SharedRuleTable, resolve};
pub use scope::{ScopeName, ScopePath};
pub use selector::{
    MAX_SELECTOR_DEPTH, ScopePattern, Segment, Selector, SelectorNode, parse_selector_node,
};
pub use specificity::Specificity;

/// Compile selector text into a reusable [`Selector`].
///
/// # Errors
/// Returns [`ParseError`] when the text is not a valid selector.
///
/// # Examples
/// ```
/// use scope_selector::{ParseErrorKind, parse_selector};
/// assert!(parse_selector("source.js -comment").is_ok());
/// let err = parse_selector("source.js (string").err();
/// assert_eq!(err.map(|e| (e.kind, e.offset)), Some((ParseErrorKind::UnclosedGroup, 10)));
/// ```
pub fn parse_selector(text: &str) -> Result<Selector, ParseError> {
    Selector::parse(text)
}

/// Evaluate a compiled selector against a scope path.
///
/// # Examples
/// ```
/// use scope_selector::{ScopePath, matches, parse_selector};
/// let selector = parse_selector("a b").unwrap_or_else(|e| panic!("{e}"));
/// assert!(matches(&selector, &ScopePath::from(["a", "x", "b"])).matched);
/// assert!(!matches(&selector, &ScopePath::from(["b", "a"])).matched);
/// ```
#[must_use]
pub fn matches(selector: &Selector, path: &ScopePath) -> MatchResult {
    selector.matches(path)
}
