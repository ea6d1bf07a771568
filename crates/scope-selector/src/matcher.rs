//! Evaluation of selector trees against scope paths.
//!
//! Every node is evaluated against a suffix of the path starting at `start`.
//! An atom anchors on the rightmost entry it matches; a descendant operand
//! must then match strictly after that anchor. Negations ignore `start` and
//! check the whole path.
//!
//! Nothing is backtracked. An alternative in descendant position commits to
//! its more specific branch, so `(x, y.z) w` misses `x w y.z` even though
//! `x w, y.z w` matches it.
//!
//! Cost is bounded by `path.len() * node_count`: each atom scans its suffix
//! once and each node is visited once.

use crate::scope::{ScopeName, ScopePath};
use crate::selector::SelectorNode;
use crate::specificity::Specificity;

/// Outcome of evaluating a selector against a scope path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    /// Whether the selector matched.
    pub matched: bool,
    /// How specifically it matched; zero when `matched` is false.
    pub specificity: Specificity,
}

impl MatchResult {
    /// The result of a selector that did not match.
    pub const NO_MATCH: Self = Self {
        matched: false,
        specificity: Specificity {
            segments: 0,
            depth: 0,
            skipped: 0,
            negations: 0,
        },
    };

    /// A successful match with the given specificity.
    #[must_use]
    pub const fn matched(specificity: Specificity) -> Self {
        Self {
            matched: true,
            specificity,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Hit {
    /// First anchor of the subtree, where a descendant gap is measured to.
    entry: Option<usize>,
    /// Absolute index descendants must match after; `None` for a match made
    /// purely of negations, which consumes no path.
    anchor: Option<usize>,
    specificity: Specificity,
}

/// Evaluate `node` against `path`.
///
/// Evaluation is total: any tree the parser produced and any path, including
/// an empty one, yields a result.
///
/// # Examples
/// ```
/// use scope_selector::{ScopePath, evaluate, parse_selector};
/// let selector = parse_selector("text.html -source.js").unwrap_or_else(|e| panic!("{e}"));
/// assert!(evaluate(selector.root(), &ScopePath::from(["text.html.basic"])).matched);
/// assert!(!evaluate(selector.root(), &ScopePath::from(["text.html", "source.js"])).matched);
/// ```
#[must_use]
pub fn evaluate(node: &SelectorNode, path: &ScopePath) -> MatchResult {
    eval(node, path.as_slice(), 0).map_or(MatchResult::NO_MATCH, |hit| {
        MatchResult::matched(hit.specificity)
    })
}

fn eval(node: &SelectorNode, scopes: &[ScopeName], start: usize) -> Option<Hit> {
    match node {
        SelectorNode::Atom(pattern) => {
            let position = start
                + scopes
                    .get(start..)?
                    .iter()
                    .rposition(|scope| pattern.matches_name(scope))?;
            Some(Hit {
                entry: Some(position),
                anchor: Some(position),
                specificity: Specificity::atom(pattern.literal_segments(), position),
            })
        }
        SelectorNode::And(left, right) => {
            let left = eval(left, scopes, start)?;
            let from = left.anchor.map_or(start, |anchor| anchor + 1);
            let right = eval(right, scopes, from)?;
            let skipped = match (left.anchor, right.entry) {
                (Some(outer), Some(inner)) => inner - outer - 1,
                _ => 0,
            };
            Some(Hit {
                entry: left.entry.or(right.entry),
                anchor: right.anchor.or(left.anchor),
                specificity: left.specificity.descend(right.specificity, skipped),
            })
        }
        SelectorNode::Or(left, right) => {
            match (eval(left, scopes, start), eval(right, scopes, start)) {
                (Some(l), Some(r)) if r.specificity > l.specificity => Some(r),
                (Some(l), _) => Some(l),
                (None, r) => r,
            }
        }
        SelectorNode::Not(operand) => match eval(operand, scopes, 0) {
            Some(_) => None,
            None => Some(Hit {
                entry: None,
                anchor: None,
                specificity: Specificity::negation(),
            }),
        },
        SelectorNode::Group(inner) => eval(inner, scopes, start),
    }
}
