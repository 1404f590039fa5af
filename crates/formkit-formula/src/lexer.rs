//! Formula lexer.
//!
//! Identifiers use the same alphabet as field ids, so any field id lexes as
//! exactly one token.

use std::fmt;

use formkit_core::identity::{is_identifier_continue, is_identifier_start};

use crate::error::FormulaError;

/// A formula token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token<'src> {
    Number(f64),
    Ident(&'src str),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "number {n}"),
            Self::Ident(name) => write!(f, "name {name}"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
        }
    }
}

/// A token and the byte offset where it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spanned<'src> {
    pub token: Token<'src>,
    pub offset: usize,
}

/// Split `src` into tokens, skipping whitespace.
pub fn tokenize(src: &str) -> Result<Vec<Spanned<'_>>, FormulaError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '(' => Token::LParen,
            ')' => Token::RParen,
            c if c.is_ascii_digit() || c == '.' => {
                let end = scan_while(src, offset, |c| c.is_ascii_digit() || c == '.');
                let text = &src[offset..end];
                let value = text
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| FormulaError::InvalidNumber {
                        text: text.to_string(),
                        offset,
                    })?;
                advance_to(&mut chars, end);
                tokens.push(Spanned {
                    token: Token::Number(value),
                    offset,
                });
                continue;
            }
            c if is_identifier_start(c) => {
                let end = scan_while(src, offset, is_identifier_continue);
                advance_to(&mut chars, end);
                tokens.push(Spanned {
                    token: Token::Ident(&src[offset..end]),
                    offset,
                });
                continue;
            }
            other => return Err(FormulaError::UnexpectedChar { ch: other, offset }),
        };
        chars.next();
        tokens.push(Spanned { token, offset });
    }

    Ok(tokens)
}

/// Byte offset of the first character at or after `start` that fails `pred`.
fn scan_while(src: &str, start: usize, pred: impl Fn(char) -> bool) -> usize {
    src[start..]
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map_or(src.len(), |(i, _)| start + i)
}

fn advance_to(chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>, end: usize) {
    while chars.next_if(|&(i, _)| i < end).is_some() {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token<'_>> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn arithmetic_tokens() {
        assert_eq!(
            kinds("(a + 2.5) * b_1 / -c"),
            vec![
                Token::LParen,
                Token::Ident("a"),
                Token::Plus,
                Token::Number(2.5),
                Token::RParen,
                Token::Star,
                Token::Ident("b_1"),
                Token::Slash,
                Token::Minus,
                Token::Ident("c"),
            ]
        );
    }

    #[test]
    fn identifiers_are_whole_tokens() {
        assert_eq!(
            kinds("price+unit_price"),
            vec![Token::Ident("price"), Token::Plus, Token::Ident("unit_price")]
        );
    }

    #[test]
    fn offsets_are_recorded() {
        let tokens = tokenize("  ab *3").unwrap();
        let offsets: Vec<usize> = tokens.iter().map(|s| s.offset).collect();
        assert_eq!(offsets, vec![2, 5, 6]);
    }

    #[test]
    fn rejects_foreign_syntax() {
        assert_eq!(
            tokenize("a % b"),
            Err(FormulaError::UnexpectedChar { ch: '%', offset: 2 })
        );
        assert!(matches!(
            tokenize("alert('x')"),
            Err(FormulaError::UnexpectedChar { ch: '\'', .. })
        ));
        assert!(matches!(
            tokenize("1.2.3"),
            Err(FormulaError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn overflowing_literals_are_invalid() {
        let huge = "9".repeat(400);
        assert_eq!(
            tokenize(&huge),
            Err(FormulaError::InvalidNumber {
                text: huge.clone(),
                offset: 0,
            })
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn tokenize_never_panics(src in "\\PC{0,40}") {
                let _ = tokenize(&src);
            }
        }
    }
}
