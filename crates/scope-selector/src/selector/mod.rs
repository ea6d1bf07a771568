//! Selector lexing, parsing and the compiled [`Selector`] handle.

mod ast;
mod lexer;
mod parser;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::ParseError;
use crate::matcher::{MatchResult, evaluate};
use crate::scope::ScopePath;

pub use ast::{ScopePattern, Segment, SelectorNode};
pub use parser::{MAX_SELECTOR_DEPTH, parse_selector_node};

/// A compiled selector: the source text plus its immutable syntax tree.
///
/// Cloning is cheap and shares the tree, so one compiled selector can be
/// evaluated from many threads at once.
///
/// # Examples
/// ```
/// use scope_selector::{ScopePath, Selector};
/// let selector = Selector::parse("source.js string, comment")
///     .unwrap_or_else(|e| panic!("{e}"));
/// let path = ScopePath::from(["source.js", "string.quoted.double.js"]);
/// assert!(selector.matches(&path).matched);
/// assert_eq!(selector.as_str(), "source.js string, comment");
/// ```
#[derive(Debug, Clone)]
pub struct Selector {
    text: Arc<str>,
    root: Arc<SelectorNode>,
}

// Equality and hashing are by source text, so a selector can key a map
// without comparing trees.
impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Selector {}

impl Hash for Selector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl Selector {
    /// Compile selector text.
    ///
    /// # Errors
    /// Returns [`ParseError`] describing the first problem found, with its
    /// byte offset.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let root = parse_selector_node(text)?;
        Ok(Self {
            text: Arc::from(text),
            root: Arc::new(root),
        })
    }

    /// The selector text as supplied.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The root of the syntax tree.
    #[must_use]
    pub fn root(&self) -> &SelectorNode {
        &self.root
    }

    /// Canonical text for the selector, which re-parses to a tree with the
    /// same match behaviour.
    #[must_use]
    pub fn canonical(&self) -> String {
        self.root.to_string()
    }

    /// Evaluate the selector against `path`.
    #[must_use]
    pub fn matches(&self, path: &ScopePath) -> MatchResult {
        evaluate(&self.root, path)
    }
}

impl FromStr for Selector {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
