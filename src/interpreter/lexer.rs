//! Splits one command line into words, quoted text and arrows.

use crate::error::SyntaxError;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Word(String),
    Quoted(String),
    Arrow,
}

impl Token {
    /// Lowercased, accent-folded form of a word, for keyword comparison.
    pub fn keyword(&self) -> Option<String> {
        match self {
            Token::Word(w) => Some(crate::ids::fold_accents(w)),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Quoted(q) => write!(f, "\"{}\"", q),
            Token::Arrow => write!(f, "'->'"),
        }
    }
}

fn is_open_quote(c: char) -> bool {
    matches!(c, '"' | '“')
}

fn is_close_quote(c: char) -> bool {
    matches!(c, '"' | '”')
}

/// Quoted text keeps every character as written, except that `\"`, `\”` and
/// `\\` stand for the quote or backslash itself.
pub fn tokenize(line: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if is_open_quote(c) {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' => match chars.peek() {
                        Some(&escaped) if escaped == '\\' || is_close_quote(escaped) => {
                            text.push(escaped);
                            chars.next();
                        }
                        _ => text.push(c),
                    },
                    c if is_close_quote(c) => {
                        closed = true;
                        break;
                    }
                    c => text.push(c),
                }
            }
            if !closed {
                return Err(SyntaxError::UnterminatedQuote);
            }
            tokens.push(Token::Quoted(text));
        } else if c == '→' {
            chars.next();
            tokens.push(Token::Arrow);
        } else if c == '-' && starts_arrow(&chars) {
            chars.next();
            chars.next();
            tokens.push(Token::Arrow);
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() || is_open_quote(c) || c == '→' {
                    break;
                }
                if c == '-' && starts_arrow(&chars) {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }

    Ok(tokens)
}

fn starts_arrow(chars: &std::iter::Peekable<std::str::Chars<'_>>) -> bool {
    let mut ahead = chars.clone();
    ahead.next() == Some('-') && ahead.next() == Some('>')
}
