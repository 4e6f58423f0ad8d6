//! Split `$filter` text into tokens.

use std::iter::Peekable;
use std::str::CharIndices;

use super::SyntaxError;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    LeftParen,
    RightParen,
    Comma,
    /// Field names and keywords. Keywords are told apart by the parser.
    Word(String),
    String(String),
    Number(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

impl Token {
    /// How the token is named in error messages.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::LeftParen => "'('".to_string(),
            TokenKind::RightParen => "')'".to_string(),
            TokenKind::Comma => "','".to_string(),
            TokenKind::Word(word) => format!("'{word}'"),
            TokenKind::String(_) => "string literal".to_string(),
            TokenKind::Number(_) => "number literal".to_string(),
        }
    }
}

/// Characters that end a word or number.
fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | ',' | '\'')
}

pub fn tokenize(input: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut chars = input.char_indices().peekable();
    let mut tokens = vec![];

    while let Some(&(position, c)) = chars.peek() {
        let kind = match c {
            c if c.is_whitespace() => {
                chars.next();
                continue;
            }
            '(' => {
                chars.next();
                TokenKind::LeftParen
            }
            ')' => {
                chars.next();
                TokenKind::RightParen
            }
            ',' => {
                chars.next();
                TokenKind::Comma
            }
            '\'' => TokenKind::String(string_literal(&mut chars, position)?),
            c if c == '-' || c.is_ascii_digit() => {
                let text = take_until_delimiter(&mut chars, input, position);
                TokenKind::Number(number_literal(text, position)?)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                TokenKind::Word(take_until_delimiter(&mut chars, input, position).to_string())
            }
            other => {
                return Err(SyntaxError::new(
                    position,
                    format!("unexpected character '{other}'"),
                ))
            }
        };
        tokens.push(Token { kind, position });
    }

    Ok(tokens)
}

fn take_until_delimiter<'a>(
    chars: &mut Peekable<CharIndices<'_>>,
    input: &'a str,
    start: usize,
) -> &'a str {
    let mut end = input.len();
    while let Some(&(index, c)) = chars.peek() {
        if is_delimiter(c) {
            end = index;
            break;
        }
        chars.next();
    }
    &input[start..end]
}

/// A single quoted string. A doubled quote stands for one quote character.
fn string_literal(
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
) -> Result<String, SyntaxError> {
    // opening quote
    chars.next();
    let mut value = String::new();
    loop {
        match chars.next() {
            None => return Err(SyntaxError::new(start, "unterminated string literal")),
            Some((_, '\'')) => {
                if matches!(chars.peek(), Some((_, '\''))) {
                    chars.next();
                    value.push('\'');
                } else {
                    return Ok(value);
                }
            }
            Some((_, c)) => value.push(c),
        }
    }
}

/// `-?digits(.digits)?([eE][+-]?digits)?`
fn number_literal(text: &str, position: usize) -> Result<f64, SyntaxError> {
    let malformed = || SyntaxError::new(position, format!("malformed number literal '{text}'"));

    let bytes = text.as_bytes();
    let mut index = usize::from(bytes.first() == Some(&b'-'));
    let digits = |index: &mut usize| {
        let start = *index;
        while *index < bytes.len() && bytes[*index].is_ascii_digit() {
            *index += 1;
        }
        *index > start
    };

    if !digits(&mut index) {
        return Err(malformed());
    }
    if bytes.get(index) == Some(&b'.') {
        index += 1;
        if !digits(&mut index) {
            return Err(malformed());
        }
    }
    if matches!(bytes.get(index), Some(b'e' | b'E')) {
        index += 1;
        if matches!(bytes.get(index), Some(b'+' | b'-')) {
            index += 1;
        }
        if !digits(&mut index) {
            return Err(malformed());
        }
    }
    if index != bytes.len() {
        return Err(malformed());
    }

    match text.parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(malformed()),
    }
}
