//! expression::lexer — byte-level tokenizer with source spans.
//!
//! Produces [`Token`]s carrying byte [`Span`]s so parse errors can report a
//! 1-based line/column. `**` and `^` both lex as [`TokenKind::Caret`].
use super::errors::ParseError;

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
    Comma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub(crate) fn line_col_1based(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let mut line = 1;
    let mut col = 1;
    for &b in &input.as_bytes()[..offset] {
        if b == b'\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

pub(crate) fn parse_err(input: &str, span: Span, message: String) -> ParseError {
    let (line, col) = line_col_1based(input, span.start);
    ParseError { message, line, col }
}

pub(crate) fn tokenize(input: &str) -> Result<Vec<Token>, ParseError> {
    if let Some((start, ch)) = input.char_indices().find(|(_, ch)| !ch.is_ascii()) {
        return Err(parse_err(
            input,
            Span { start, end: start + ch.len_utf8() },
            format!("unsupported character '{ch}'"),
        ));
    }

    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_whitespace() {
            i += 1;
            continue;
        }

        let start = i;
        let kind = match b {
            b'+' => {
                i += 1;
                TokenKind::Plus
            }
            b'-' => {
                i += 1;
                TokenKind::Minus
            }
            b'*' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                TokenKind::Caret
            }
            b'*' => {
                i += 1;
                TokenKind::Star
            }
            b'/' => {
                i += 1;
                TokenKind::Slash
            }
            b'^' => {
                i += 1;
                TokenKind::Caret
            }
            b'(' => {
                i += 1;
                TokenKind::LParen
            }
            b')' => {
                i += 1;
                TokenKind::RParen
            }
            b',' => {
                i += 1;
                TokenKind::Comma
            }
            b'0'..=b'9' | b'.' => {
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                // exponent only when followed by a digit (optionally signed)
                if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
                    let mut j = i + 1;
                    if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
                        j += 1;
                    }
                    if j < bytes.len() && bytes[j].is_ascii_digit() {
                        i = j;
                        while i < bytes.len() && bytes[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text = &input[start..i];
                let value: f64 = text.parse().map_err(|_| {
                    parse_err(input, Span { start, end: i }, format!("invalid number '{text}'"))
                })?;
                TokenKind::Num(value)
            }
            b if b.is_ascii_alphabetic() || b == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                TokenKind::Ident(input[start..i].to_string())
            }
            other => {
                return Err(parse_err(
                    input,
                    Span { start, end: start + 1 },
                    format!("unexpected character '{}'", other as char),
                ));
            }
        };
        tokens.push(Token { kind, span: Span { start, end: i } });
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn power_spellings_lex_to_one_token() {
        assert_eq!(
            kinds("z**2 ^ 3"),
            vec![
                TokenKind::Ident("z".into()),
                TokenKind::Caret,
                TokenKind::Num(2.0),
                TokenKind::Caret,
                TokenKind::Num(3.0)
            ]
        );
    }

    #[test]
    // Purpose
    // -------
    // Scientific notation is consumed only when a digit follows the marker,
    // so `2e` stays a number times a symbol and `1.5e-3` is one literal.
    fn numbers_accept_scientific_notation() {
        assert_eq!(kinds("1.5e-3"), vec![TokenKind::Num(1.5e-3)]);
        assert_eq!(kinds("2E+2"), vec![TokenKind::Num(200.0)]);
        assert_eq!(kinds("2e"), vec![TokenKind::Num(2.0), TokenKind::Ident("e".into())]);
    }

    #[test]
    fn errors_report_line_and_column() {
        let err = tokenize("a +\n  b $ c").unwrap_err();
        assert_eq!((err.line, err.col), (2, 5));
        assert!(err.message.contains('$'));

        let err = tokenize("1..2").unwrap_err();
        assert_eq!((err.line, err.col), (1, 1));
    }
}
