//! Selector specificity for choosing between competing matches.
//!
//! When several selectors match the same scope path, the one with the
//! highest specificity wins. More specific selectors name more scope
//! segments, match deeper in the path, and keep their descendant anchors
//! close together.

use std::cmp::Ordering;

/// Specificity of a successful selector match.
///
/// # Ordering
///
/// Scores are compared by:
/// 1. More literal (non-wildcard) segments matched → more specific
/// 2. Deeper innermost match position → more specific
/// 3. Fewer path entries skipped between descendant anchors → more specific
/// 4. More satisfied negations → more specific (tiebreaker)
///
/// A negation on its own scores zero on the first two criteria, so it never
/// outranks a positive atom match.
///
/// # Examples
///
/// ```
/// use scope_selector::{ScopePath, parse_selector};
///
/// let path = ScopePath::from(["source.js", "string.quoted.double"]);
/// let specific = parse_selector("source.js string.quoted").unwrap_or_else(|e| panic!("{e}"));
/// let generic = parse_selector("string").unwrap_or_else(|e| panic!("{e}"));
/// assert!(specific.matches(&path).specificity > generic.matches(&path).specificity);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Specificity {
    /// Literal segments matched across the atoms of the winning branch.
    pub segments: u32,
    /// One-based position of the deepest path entry matched; zero when only
    /// negations matched.
    pub depth: u32,
    /// Path entries skipped between consecutive descendant anchors.
    pub skipped: u32,
    /// Negations that held.
    pub negations: u32,
}

fn saturate(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

fn lane(value: u32) -> u64 {
    u64::from(value.min(u32::from(u16::MAX)))
}

impl Specificity {
    /// Score of an atom with `segments` literal segments whose deepest match
    /// sits at zero-based path index `position`.
    pub(crate) fn atom(segments: usize, position: usize) -> Self {
        Self {
            segments: saturate(segments),
            depth: saturate(position).saturating_add(1),
            skipped: 0,
            negations: 0,
        }
    }

    /// Score of a negation that held.
    pub(crate) const fn negation() -> Self {
        Self {
            segments: 0,
            depth: 0,
            skipped: 0,
            negations: 1,
        }
    }

    /// Combine the scores of a descendant pair whose anchors are `skipped`
    /// path entries apart.
    pub(crate) fn descend(self, right: Self, skipped: usize) -> Self {
        Self {
            segments: self.segments.saturating_add(right.segments),
            depth: self.depth.max(right.depth),
            skipped: self
                .skipped
                .saturating_add(right.skipped)
                .saturating_add(saturate(skipped)),
            negations: self.negations.saturating_add(right.negations),
        }
    }

    /// Pack the score into one integer with the same ordering.
    ///
    /// Each criterion occupies 16 bits, most significant first; values past
    /// `u16::MAX` saturate, which only matters for paths or selectors far
    /// beyond anything an editor produces.
    ///
    /// # Examples
    /// ```
    /// use scope_selector::{ScopePath, parse_selector};
    /// let path = ScopePath::from(["a.b", "c"]);
    /// let deep = parse_selector("a.b c").unwrap_or_else(|e| panic!("{e}"));
    /// let shallow = parse_selector("a").unwrap_or_else(|e| panic!("{e}"));
    /// assert!(
    ///     deep.matches(&path).specificity.as_scalar()
    ///         > shallow.matches(&path).specificity.as_scalar()
    /// );
    /// ```
    #[must_use]
    pub fn as_scalar(&self) -> u64 {
        let closeness = u64::from(u16::MAX) - lane(self.skipped);
        (lane(self.segments) << 48)
            | (lane(self.depth) << 32)
            | (closeness << 16)
            | lane(self.negations)
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        // More literal segments → more specific
        match self.segments.cmp(&other.segments) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // Deeper match → more specific
        match self.depth.cmp(&other.depth) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // Fewer skipped entries → more specific (reverse comparison)
        match other.skipped.cmp(&self.skipped) {
            Ordering::Equal => {}
            ord => return ord,
        }

        // More negations → more specific (tiebreaker)
        self.negations.cmp(&other.negations)
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
