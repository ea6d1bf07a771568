//! Error types surfaced while parsing selector text.

use thiserror::Error;

/// What went wrong while parsing a selector.
///
/// The kind carries the human-readable reason; the byte offset lives on
/// [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The selector is empty or contains only whitespace.
    #[error("empty selector")]
    EmptySelector,
    /// A `(` was never closed.
    #[error("unclosed '(' in selector")]
    UnclosedGroup,
    /// A `)` has no matching `(`.
    #[error("unmatched closing ')' in selector")]
    UnmatchedCloseParen,
    /// A group contains no expression, as in `()`.
    #[error("empty group '()'")]
    EmptyGroup,
    /// An operator has no operand on one of its sides.
    #[error("dangling operator '{0}'")]
    DanglingOperator(char),
    /// A character outside the selector alphabet.
    #[error("illegal character {0:?}")]
    IllegalCharacter(char),
    /// A scope name with an empty dot-separated segment, such as `a..b`.
    #[error("empty segment in scope name")]
    EmptySegment,
    /// Two operands follow each other without whitespace or `,`.
    #[error("expected whitespace or ',' between selector operands")]
    MissingSeparator,
    /// Groups and negations are nested beyond the parser's limit.
    #[error("selector nesting exceeds {0} levels")]
    NestingTooDeep(usize),
}

/// A selector that failed to parse.
///
/// # Examples
/// ```
/// use scope_selector::{ParseError, ParseErrorKind};
/// let err = ParseError::new(ParseErrorKind::UnclosedGroup, 3);
/// assert_eq!(err.offset, 3);
/// assert_eq!(err.to_string(), "unclosed '(' in selector at byte 3 (zero-based)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at byte {offset} (zero-based)")]
pub struct ParseError {
    /// Reason for the failure.
    pub kind: ParseErrorKind,
    /// Zero-based byte offset in the selector text where parsing failed.
    pub offset: usize,
}

impl ParseError {
    /// Create a new parse error at `offset`.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, offset: usize) -> Self {
        Self { kind, offset }
    }
}

pub(crate) const fn parse_error(kind: ParseErrorKind, offset: usize) -> ParseError {
    ParseError::new(kind, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_kind_with_offset() {
        let err = ParseError::new(ParseErrorKind::DanglingOperator(','), 4);
        assert_eq!(
            err.to_string(),
            "dangling operator ',' at byte 4 (zero-based)"
        );
    }

    #[test]
    fn formats_illegal_character_with_quotes() {
        let err = ParseError::new(ParseErrorKind::IllegalCharacter('$'), 0);
        assert_eq!(err.to_string(), "illegal character '$' at byte 0 (zero-based)");
    }

    #[test]
    fn formats_nesting_limit() {
        let err = ParseError::new(ParseErrorKind::NestingTooDeep(64), 70);
        assert!(err.to_string().contains("exceeds 64 levels"));
    }
}
