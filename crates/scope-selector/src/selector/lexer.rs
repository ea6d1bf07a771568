//! Selector lexer converting selector text into operator and name tokens.

use crate::errors::{ParseError, ParseErrorKind, parse_error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Name { start: usize, text: &'a str },
    /// A run of spaces and tabs.
    Space { start: usize },
    Comma { index: usize },
    Minus { index: usize },
    OpenParen { index: usize },
    CloseParen { index: usize },
}

impl Token<'_> {
    pub(crate) const fn offset(&self) -> usize {
        match *self {
            Self::Name { start, .. } | Self::Space { start } => start,
            Self::Comma { index }
            | Self::Minus { index }
            | Self::OpenParen { index }
            | Self::CloseParen { index } => index,
        }
    }
}

const fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t')
}

/// Characters that may follow a name.
const fn ends_name(c: char) -> bool {
    is_blank(c) || matches!(c, ',' | '(' | ')')
}

const fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '*')
}

/// `-` reaching the lexer's main loop is always in operator position: names
/// are consumed greedily, so a `-` inside a name never starts a token.
pub(crate) fn lex_selector(text: &str) -> Result<Vec<Token<'_>>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some(&(pos, c)) = chars.peek() {
        match c {
            c if is_blank(c) => {
                while chars.next_if(|&(_, c)| is_blank(c)).is_some() {}
                tokens.push(Token::Space { start: pos });
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma { index: pos });
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus { index: pos });
            }
            '(' => {
                chars.next();
                tokens.push(Token::OpenParen { index: pos });
            }
            ')' => {
                chars.next();
                tokens.push(Token::CloseParen { index: pos });
            }
            c if is_name_char(c) => {
                while chars.next_if(|&(_, c)| is_name_char(c)).is_some() {}
                let end = match chars.peek() {
                    None => text.len(),
                    Some(&(end, next)) if ends_name(next) => end,
                    Some(&(index, other)) => {
                        return Err(parse_error(ParseErrorKind::IllegalCharacter(other), index));
                    }
                };
                let name = text.get(pos..end).unwrap_or_default();
                validate_name(name, pos)?;
                tokens.push(Token::Name {
                    start: pos,
                    text: name,
                });
            }
            other => return Err(parse_error(ParseErrorKind::IllegalCharacter(other), pos)),
        }
    }

    Ok(tokens)
}

/// Reject empty segments and `*` mixed into a literal segment.
fn validate_name(name: &str, start: usize) -> Result<(), ParseError> {
    let mut offset = start;
    for segment in name.split('.') {
        if segment.is_empty() {
            return Err(parse_error(ParseErrorKind::EmptySegment, offset));
        }
        if segment != "*" {
            if let Some(star) = segment.find('*') {
                return Err(parse_error(
                    ParseErrorKind::IllegalCharacter('*'),
                    offset + star,
                ));
            }
        }
        offset += segment.len() + 1;
    }
    Ok(())
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests exercise lexing fallibility")]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn tokenises_names_and_operators() {
        let tokens = lex_selector("text.html -(source.js, string)").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name {
                    start: 0,
                    text: "text.html",
                },
                Token::Space { start: 9 },
                Token::Minus { index: 10 },
                Token::OpenParen { index: 11 },
                Token::Name {
                    start: 12,
                    text: "source.js",
                },
                Token::Comma { index: 21 },
                Token::Space { start: 22 },
                Token::Name {
                    start: 23,
                    text: "string",
                },
                Token::CloseParen { index: 29 },
            ]
        );
    }

    #[test]
    fn keeps_hyphens_inside_names() {
        let tokens = lex_selector("source.c-sharp meta.tag-name").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Name {
                    start: 0,
                    text: "source.c-sharp",
                },
                Token::Space { start: 14 },
                Token::Name {
                    start: 15,
                    text: "meta.tag-name",
                },
            ]
        );
    }

    #[test]
    fn collapses_mixed_blank_runs() {
        let tokens = lex_selector("a \t  b").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens.get(1), Some(&Token::Space { start: 1 }));
    }

    #[test]
    fn accepts_whole_segment_wildcards() {
        let tokens = lex_selector("meta.*.js").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Name {
                start: 0,
                text: "meta.*.js",
            }]
        );
    }

    #[rstest]
    #[case("a..b", ParseErrorKind::EmptySegment, 2)]
    #[case(".a", ParseErrorKind::EmptySegment, 0)]
    #[case("x a.", ParseErrorKind::EmptySegment, 4)]
    #[case("a$b", ParseErrorKind::IllegalCharacter('$'), 1)]
    #[case("a.b*", ParseErrorKind::IllegalCharacter('*'), 3)]
    #[case("source.é", ParseErrorKind::IllegalCharacter('é'), 7)]
    #[case("a.$", ParseErrorKind::IllegalCharacter('$'), 2)]
    #[case("x a.b.é, c", ParseErrorKind::IllegalCharacter('é'), 6)]
    #[case("a\nb", ParseErrorKind::IllegalCharacter('\n'), 1)]
    fn rejects_malformed_names(
        #[case] text: &str,
        #[case] kind: ParseErrorKind,
        #[case] offset: usize,
    ) {
        let Err(err) = lex_selector(text) else {
            panic!("{text:?} should fail to lex");
        };
        assert_eq!(err, ParseError::new(kind, offset));
    }
}
