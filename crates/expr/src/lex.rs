use std::{iter::Peekable, str::CharIndices};

use crate::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) pos: usize,
}

/// Splits expression text into tokens.
///
/// `**` is accepted as a synonym for `^`. Identifiers may contain dots so
/// that module-qualified names such as `np.sin` survive as one token.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, ParseError> {
    let mut chars = src.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some(&(pos, ch)) = chars.peek() {
        let kind = match ch {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            c if c.is_ascii_digit() || c == '.' => number(src, &mut chars)?,
            c if c.is_ascii_alphabetic() || c == '_' => ident(src, &mut chars),
            '*' => {
                chars.next();
                if chars.next_if(|&(_, c)| c == '*').is_some() {
                    TokenKind::Caret
                } else {
                    TokenKind::Star
                }
            }
            _ => {
                chars.next();
                match ch {
                    '+' => TokenKind::Plus,
                    '-' => TokenKind::Minus,
                    '/' => TokenKind::Slash,
                    '^' => TokenKind::Caret,
                    '(' => TokenKind::LParen,
                    ')' => TokenKind::RParen,
                    _ => return Err(ParseError::UnexpectedChar { ch, pos }),
                }
            }
        };
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}

fn number(src: &str, chars: &mut Peekable<CharIndices<'_>>) -> Result<TokenKind, ParseError> {
    let start = chars.peek().map_or(src.len(), |&(pos, _)| pos);
    let mut end = start;

    while let Some((pos, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit() || c == '.') {
        end = pos + c.len_utf8();
    }

    // Exponent part, only when followed by digits so `2e` stays an error.
    let rest = &src[end..];
    let mut exp = rest.chars();
    if matches!(exp.next(), Some('e' | 'E')) {
        let mut len = 1;
        let mut next = exp.next();
        if matches!(next, Some('+' | '-')) {
            len += 1;
            next = exp.next();
        }
        if next.is_some_and(|c| c.is_ascii_digit()) {
            for _ in 0..len {
                chars.next();
            }
            while let Some((pos, c)) = chars.next_if(|&(_, c)| c.is_ascii_digit()) {
                end = pos + c.len_utf8();
            }
        }
    }

    let text = &src[start..end];
    text.parse()
        .map(TokenKind::Num)
        .map_err(|_| ParseError::InvalidNumber {
            text: text.to_string(),
            pos: start,
        })
}

fn ident(src: &str, chars: &mut Peekable<CharIndices<'_>>) -> TokenKind {
    let start = chars.peek().map_or(src.len(), |&(pos, _)| pos);
    let mut end = start;

    while let Some((pos, c)) =
        chars.next_if(|&(_, c)| c.is_ascii_alphanumeric() || c == '_' || c == '.')
    {
        end = pos + c.len_utf8();
    }

    TokenKind::Ident(src[start..end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        tokenize(src)
            .expect("should tokenize")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn splits_operators_and_numbers() {
        assert_eq!(
            kinds("2.5*x**2 - 1e-3"),
            vec![
                TokenKind::Num(2.5),
                TokenKind::Star,
                TokenKind::Ident("x".into()),
                TokenKind::Caret,
                TokenKind::Num(2.0),
                TokenKind::Minus,
                TokenKind::Num(1e-3),
            ]
        );
    }

    #[test]
    fn keeps_qualified_names_together() {
        assert_eq!(
            kinds("np.cos(x)"),
            vec![
                TokenKind::Ident("np.cos".into()),
                TokenKind::LParen,
                TokenKind::Ident("x".into()),
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn exponent_needs_digits() {
        assert_eq!(
            kinds("2e"),
            vec![TokenKind::Num(2.0), TokenKind::Ident("e".into())]
        );
        assert_eq!(kinds("2E+2"), vec![TokenKind::Num(200.0)]);
    }

    #[test]
    fn reports_positions() {
        let tokens = tokenize("x +  y").expect("should tokenize");
        let positions: Vec<usize> = tokens.iter().map(|t| t.pos).collect();
        assert_eq!(positions, vec![0, 2, 5]);
    }

    #[test]
    fn rejects_unknown_characters() {
        assert_eq!(
            tokenize("x $ 1"),
            Err(ParseError::UnexpectedChar { ch: '$', pos: 2 })
        );
        assert!(matches!(
            tokenize("1.2.3"),
            Err(ParseError::InvalidNumber { pos: 0, .. })
        ));
    }
}
