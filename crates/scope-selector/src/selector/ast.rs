//! Immutable selector syntax tree.

use std::fmt;

use crate::scope::ScopeName;

/// One dot-separated segment of a scope pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Matches a scope segment with exactly this text.
    Literal(Box<str>),
    /// `*`: matches any single segment and adds nothing to specificity.
    Wildcard,
}

impl Segment {
    fn matches(&self, segment: &str) -> bool {
        match self {
            Self::Literal(text) => &**text == segment,
            Self::Wildcard => !segment.is_empty(),
        }
    }
}

/// The scope-name pattern carried by an atom, e.g. `string.quoted`.
///
/// A pattern matches a scope name when its segments equal the leading
/// segments of the name: `source.js` matches `source.js.embedded.html` but
/// not `source.javascript`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopePattern {
    text: Box<str>,
    segments: Vec<Segment>,
}

impl ScopePattern {
    /// Build a pattern from text the lexer has already validated.
    pub(crate) fn from_validated(text: &str) -> Self {
        let segments = text
            .split('.')
            .map(|segment| match segment {
                "*" => Segment::Wildcard,
                literal => Segment::Literal(literal.into()),
            })
            .collect();
        Self {
            text: text.into(),
            segments,
        }
    }

    /// The pattern as written in the selector.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Count of non-wildcard segments.
    #[must_use]
    pub fn literal_segments(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, Segment::Literal(_)))
            .count()
    }

    /// Whether this pattern is a segment prefix of `name`.
    ///
    /// # Examples
    /// ```
    /// use scope_selector::{ScopeName, SelectorNode, parse_selector};
    /// let selector = parse_selector("source.js").unwrap_or_else(|e| panic!("{e}"));
    /// let SelectorNode::Atom(pattern) = selector.root() else { panic!("atom") };
    /// assert!(pattern.matches_name(&ScopeName::from("source.js.embedded.html")));
    /// assert!(!pattern.matches_name(&ScopeName::from("source.javascript")));
    /// ```
    #[must_use]
    pub fn matches_name(&self, name: &ScopeName) -> bool {
        let mut names = name.segments();
        self.segments
            .iter()
            .all(|segment| names.next().is_some_and(|actual| segment.matches(actual)))
    }
}

impl fmt::Display for ScopePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A parsed selector expression.
///
/// Each node owns its children; trees are never mutated after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SelectorNode {
    /// A single scope pattern.
    Atom(ScopePattern),
    /// `left right`: `right` must match strictly deeper in the path than
    /// `left`.
    And(Box<Self>, Box<Self>),
    /// `left, right`: either side may match; the more specific one wins.
    Or(Box<Self>, Box<Self>),
    /// `-operand`: matches when the operand does not.
    Not(Box<Self>),
    /// `(inner)`: precedence only.
    Group(Box<Self>),
}

impl SelectorNode {
    pub(crate) fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    pub(crate) fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    pub(crate) fn not(operand: Self) -> Self {
        Self::Not(Box::new(operand))
    }

    pub(crate) fn group(inner: Self) -> Self {
        Self::Group(Box::new(inner))
    }
}

/// Renders the canonical selector text: single spaces for descendants,
/// `", "` between alternatives.
impl fmt::Display for SelectorNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(pattern) => write!(f, "{pattern}"),
            Self::And(left, right) => write!(f, "{left} {right}"),
            Self::Or(left, right) => write!(f, "{left}, {right}"),
            Self::Not(operand) => write!(f, "-{operand}"),
            Self::Group(inner) => write!(f, "({inner})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn atom(text: &str) -> SelectorNode {
        SelectorNode::Atom(ScopePattern::from_validated(text))
    }

    #[rstest]
    #[case("a.b", "a.b.c", true)]
    #[case("a.b", "a.b", true)]
    #[case("a.b", "a.bc", false)]
    #[case("a.b", "x.a.b", false)]
    #[case("a.b", "a", false)]
    #[case("a.*.c", "a.b.c.d", true)]
    #[case("a.*", "a", false)]
    #[case("a", "", false)]
    #[case("Source", "source", false)]
    fn matches_leading_segments(#[case] pattern: &str, #[case] name: &str, #[case] expected: bool) {
        let pattern = ScopePattern::from_validated(pattern);
        assert_eq!(pattern.matches_name(&ScopeName::from(name)), expected);
    }

    #[test]
    fn wildcards_do_not_count_as_literal_segments() {
        assert_eq!(ScopePattern::from_validated("a.*.c").literal_segments(), 2);
        assert_eq!(ScopePattern::from_validated("*").literal_segments(), 0);
    }

    #[test]
    fn renders_canonical_text() {
        let node = SelectorNode::or(
            SelectorNode::and(atom("a"), SelectorNode::not(atom("b"))),
            SelectorNode::group(SelectorNode::and(atom("c"), atom("d.e"))),
        );
        assert_eq!(node.to_string(), "a -b, (c d.e)");
    }
}
