//! Recursive-descent parser building [`SelectorNode`] trees from tokens.
//!
//! Precedence, loosest first: `,` (or), whitespace (descendant), `-` (not).
//! Whitespace next to `,`, `(`, `)` and at either end of the input carries no
//! meaning.

use crate::errors::{ParseError, ParseErrorKind, parse_error};

use super::ast::{ScopePattern, SelectorNode};
use super::lexer::{Token, lex_selector};

/// Maximum depth of a parsed tree, counting groups, negations and each link
/// of a `,` or descendant chain. Evaluation recurses over the tree, so the
/// limit bounds stack use as well as parsing.
pub const MAX_SELECTOR_DEPTH: usize = 256;

/// A subtree together with its depth.
struct Parsed {
    node: SelectorNode,
    depth: usize,
}

impl Parsed {
    fn leaf(node: SelectorNode) -> Self {
        Self { node, depth: 1 }
    }
}

struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    pos: usize,
    text_len: usize,
    nesting: usize,
}

/// Parse selector text into a syntax tree.
///
/// # Errors
/// Returns [`ParseError`] for empty input, unbalanced parentheses, dangling
/// operators, illegal characters, empty name segments, operands lacking a
/// separator, and trees deeper than [`MAX_SELECTOR_DEPTH`].
pub fn parse_selector_node(text: &str) -> Result<SelectorNode, ParseError> {
    let tokens = lex_selector(text)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        text_len: text.len(),
        nesting: 0,
    };

    parser.skip_space();
    if parser.peek().is_none() {
        return Err(parse_error(ParseErrorKind::EmptySelector, 0));
    }
    let parsed = parser.parse_or()?;
    parser.skip_space();
    match parser.peek() {
        None => Ok(parsed.node),
        Some(Token::CloseParen { index }) => {
            Err(parse_error(ParseErrorKind::UnmatchedCloseParen, index))
        }
        Some(other) => Err(parse_error(
            ParseErrorKind::MissingSeparator,
            other.offset(),
        )),
    }
}

impl<'a> Parser<'_, 'a> {
    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_at(&self, pos: usize) -> Option<Token<'a>> {
        self.tokens.get(pos).copied()
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_space(&mut self) {
        while matches!(self.peek(), Some(Token::Space { .. })) {
            self.advance();
        }
    }

    fn starts_operand(token: Option<Token<'_>>) -> bool {
        matches!(
            token,
            Some(Token::Name { .. } | Token::Minus { .. } | Token::OpenParen { .. })
        )
    }

    fn enter(&mut self, offset: usize) -> Result<(), ParseError> {
        self.nesting += 1;
        if self.nesting > MAX_SELECTOR_DEPTH {
            return Err(parse_error(
                ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH),
                offset,
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.nesting -= 1;
    }

    fn wrap(
        inner: Parsed,
        offset: usize,
        build: fn(SelectorNode) -> SelectorNode,
    ) -> Result<Parsed, ParseError> {
        let depth = inner.depth + 1;
        if depth > MAX_SELECTOR_DEPTH {
            return Err(parse_error(
                ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH),
                offset,
            ));
        }
        Ok(Parsed {
            node: build(inner.node),
            depth,
        })
    }

    fn combine(
        left: Parsed,
        right: Parsed,
        offset: usize,
        build: fn(SelectorNode, SelectorNode) -> SelectorNode,
    ) -> Result<Parsed, ParseError> {
        let depth = left.depth.max(right.depth) + 1;
        if depth > MAX_SELECTOR_DEPTH {
            return Err(parse_error(
                ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH),
                offset,
            ));
        }
        Ok(Parsed {
            node: build(left.node, right.node),
            depth,
        })
    }

    fn parse_or(&mut self) -> Result<Parsed, ParseError> {
        let mut parsed = self.parse_and()?;
        loop {
            self.skip_space();
            let Some(Token::Comma { index }) = self.peek() else {
                break;
            };
            self.advance();
            self.skip_space();
            if !Self::starts_operand(self.peek()) {
                return Err(parse_error(ParseErrorKind::DanglingOperator(','), index));
            }
            let right = self.parse_and()?;
            parsed = Self::combine(parsed, right, index, SelectorNode::or)?;
        }
        Ok(parsed)
    }

    fn parse_and(&mut self) -> Result<Parsed, ParseError> {
        let mut parsed = self.parse_not()?;
        // A blank only separates descendants when another operand follows;
        // otherwise it belongs to the surrounding `,` or `)`.
        while let Some(Token::Space { start }) = self.peek() {
            if !Self::starts_operand(self.peek_at(self.pos + 1)) {
                break;
            }
            self.advance();
            let right = self.parse_not()?;
            parsed = Self::combine(parsed, right, start, SelectorNode::and)?;
        }
        Ok(parsed)
    }

    fn parse_not(&mut self) -> Result<Parsed, ParseError> {
        let Some(Token::Minus { index }) = self.peek() else {
            return self.parse_primary();
        };
        self.advance();
        if !matches!(
            self.peek(),
            Some(Token::Name { .. } | Token::OpenParen { .. })
        ) {
            return Err(parse_error(ParseErrorKind::DanglingOperator('-'), index));
        }
        self.enter(index)?;
        let operand = self.parse_primary()?;
        self.leave();
        Self::wrap(operand, index, SelectorNode::not)
    }

    fn parse_primary(&mut self) -> Result<Parsed, ParseError> {
        match self.peek() {
            Some(Token::Name { text, .. }) => {
                self.advance();
                Ok(Parsed::leaf(SelectorNode::Atom(
                    ScopePattern::from_validated(text),
                )))
            }
            Some(Token::OpenParen { index }) => self.parse_group(index),
            Some(Token::CloseParen { index }) => {
                Err(parse_error(ParseErrorKind::UnmatchedCloseParen, index))
            }
            Some(Token::Comma { index }) => {
                Err(parse_error(ParseErrorKind::DanglingOperator(','), index))
            }
            Some(Token::Minus { index }) => {
                Err(parse_error(ParseErrorKind::DanglingOperator('-'), index))
            }
            Some(Token::Space { start }) => {
                Err(parse_error(ParseErrorKind::MissingSeparator, start))
            }
            None => Err(parse_error(ParseErrorKind::EmptySelector, self.text_len)),
        }
    }

    fn parse_group(&mut self, open: usize) -> Result<Parsed, ParseError> {
        self.advance();
        self.enter(open)?;
        self.skip_space();
        match self.peek() {
            None => return Err(parse_error(ParseErrorKind::UnclosedGroup, open)),
            Some(Token::CloseParen { .. }) => {
                return Err(parse_error(ParseErrorKind::EmptyGroup, open));
            }
            Some(_) => {}
        }
        let inner = self.parse_or()?;
        self.skip_space();
        match self.peek() {
            Some(Token::CloseParen { .. }) => self.advance(),
            None => return Err(parse_error(ParseErrorKind::UnclosedGroup, open)),
            Some(other) => {
                return Err(parse_error(
                    ParseErrorKind::MissingSeparator,
                    other.offset(),
                ));
            }
        }
        self.leave();
        Self::wrap(inner, open, SelectorNode::group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse_ok(text: &str) -> SelectorNode {
        match parse_selector_node(text) {
            Ok(node) => node,
            Err(err) => panic!("{text:?} should parse: {err}"),
        }
    }

    fn parse_err(text: &str) -> ParseError {
        match parse_selector_node(text) {
            Ok(node) => panic!("{text:?} should fail, parsed as {node}"),
            Err(err) => err,
        }
    }

    #[rstest]
    #[case("source.js", "source.js")]
    #[case("  text.html  ", "text.html")]
    #[case("a b c", "a b c")]
    #[case("a,b", "a, b")]
    #[case("a ,  b", "a, b")]
    #[case("a -b", "a -b")]
    #[case("-a", "-a")]
    #[case("( a b ) , c", "(a b), c")]
    #[case("a -(b, c)", "a -(b, c)")]
    #[case("a\tb", "a b")]
    fn renders_canonical_form(#[case] text: &str, #[case] canonical: &str) {
        assert_eq!(parse_ok(text).to_string(), canonical);
    }

    #[test]
    fn or_binds_looser_than_descendant() {
        let SelectorNode::Or(left, right) = parse_ok("a b, c") else {
            panic!("expected an or node at the root");
        };
        assert!(matches!(*left, SelectorNode::And(_, _)));
        assert!(matches!(*right, SelectorNode::Atom(_)));
    }

    #[test]
    fn descendant_chains_associate_left() {
        let SelectorNode::And(left, right) = parse_ok("a b c") else {
            panic!("expected an and node at the root");
        };
        assert_eq!(left.to_string(), "a b");
        assert_eq!(right.to_string(), "c");
    }

    #[test]
    fn negation_applies_to_next_operand_only() {
        let SelectorNode::And(left, right) = parse_ok("-a b") else {
            panic!("expected an and node at the root");
        };
        assert!(matches!(*left, SelectorNode::Not(_)));
        assert!(matches!(*right, SelectorNode::Atom(_)));
    }

    #[rstest]
    #[case("", ParseErrorKind::EmptySelector, 0)]
    #[case("   ", ParseErrorKind::EmptySelector, 0)]
    #[case("(a", ParseErrorKind::UnclosedGroup, 0)]
    #[case("a (b c", ParseErrorKind::UnclosedGroup, 2)]
    #[case("a)", ParseErrorKind::UnmatchedCloseParen, 1)]
    #[case(")", ParseErrorKind::UnmatchedCloseParen, 0)]
    #[case("()", ParseErrorKind::EmptyGroup, 0)]
    #[case("a, ( )", ParseErrorKind::EmptyGroup, 3)]
    #[case("a,", ParseErrorKind::DanglingOperator(','), 1)]
    #[case("a, ", ParseErrorKind::DanglingOperator(','), 1)]
    #[case(",a", ParseErrorKind::DanglingOperator(','), 0)]
    #[case("a,,b", ParseErrorKind::DanglingOperator(','), 1)]
    #[case("a -", ParseErrorKind::DanglingOperator('-'), 2)]
    #[case("-", ParseErrorKind::DanglingOperator('-'), 0)]
    #[case("--a", ParseErrorKind::DanglingOperator('-'), 0)]
    #[case("- a", ParseErrorKind::DanglingOperator('-'), 0)]
    #[case("(a -)", ParseErrorKind::DanglingOperator('-'), 3)]
    #[case("(a)b", ParseErrorKind::MissingSeparator, 3)]
    #[case("a(b)", ParseErrorKind::MissingSeparator, 1)]
    #[case("(a)-b", ParseErrorKind::MissingSeparator, 3)]
    #[case("a+b", ParseErrorKind::IllegalCharacter('+'), 1)]
    fn reports_errors_with_offsets(
        #[case] text: &str,
        #[case] kind: ParseErrorKind,
        #[case] offset: usize,
    ) {
        assert_eq!(parse_err(text), ParseError::new(kind, offset));
    }

    #[test]
    fn rejects_excessive_group_nesting() {
        let text = format!("{}a{}", "(".repeat(300), ")".repeat(300));
        let err = parse_err(&text);
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH));
    }

    #[test]
    fn rejects_excessively_long_chains() {
        let text = vec!["a"; MAX_SELECTOR_DEPTH + 1].join(", ");
        let err = parse_err(&text);
        assert_eq!(err.kind, ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH));
    }

    #[test]
    fn group_around_a_full_chain_exceeds_the_limit() {
        let chain = vec!["a"; MAX_SELECTOR_DEPTH].join(" ");
        let err = parse_err(&format!("({chain})"));
        assert_eq!(
            err,
            ParseError::new(ParseErrorKind::NestingTooDeep(MAX_SELECTOR_DEPTH), 0)
        );
    }

    #[test]
    fn accepts_chains_within_the_limit() {
        let text = vec!["a"; MAX_SELECTOR_DEPTH].join(" ");
        assert!(parse_selector_node(&text).is_ok());
    }
}
