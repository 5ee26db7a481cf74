//! Schema tokenizer - converts schema text into a token stream
//!
//! Handles: identifiers, string literals (single or double quoted),
//! integer literals, and the symbols `{ } : , ;`.
//! Comments (`#` to end of line) are discarded.
//!
//! Guarantees:
//! - Deterministic: same input always produces same token stream
//! - Errors carry line:column

use crate::{Error, Result};

/// Token types for schema syntax
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // Literals
    StringLiteral(String),
    IntegerLiteral(i64),

    // Symbols
    LBrace,    // {
    RBrace,    // }
    Colon,     // :
    Comma,     // ,
    Semicolon, // ;

    // Other
    Identifier(String),
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::StringLiteral(s) => write!(f, "\"{}\"", s),
            Token::IntegerLiteral(i) => write!(f, "{}", i),
            Token::LBrace => write!(f, "'{{'"),
            Token::RBrace => write!(f, "'}}'"),
            Token::Colon => write!(f, "':'"),
            Token::Comma => write!(f, "','"),
            Token::Semicolon => write!(f, "';'"),
            Token::Identifier(s) => write!(f, "{}", s),
            Token::Eof => write!(f, "end of input"),
        }
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenizer for schema source text
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Tokenizer {
    /// Create a new tokenizer for the given input text
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input into a stream of spanned tokens
    pub fn tokenize(&mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace_and_comments();

            let Some(ch) = self.peek() else {
                tokens.push(SpannedToken {
                    token: Token::Eof,
                    span: self.current_span(),
                });
                break;
            };

            tokens.push(self.next_token(ch)?);
        }

        Ok(tokens)
    }

    // ── Character helpers ──────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    // ── Whitespace & Comments ──────────────────────────────

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while let Some(ch) = self.peek() {
                if ch.is_ascii_whitespace() {
                    self.advance();
                } else {
                    break;
                }
            }

            if self.peek() == Some('#') {
                while let Some(ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    // ── Main dispatch ──────────────────────────────────────

    fn next_token(&mut self, ch: char) -> Result<SpannedToken> {
        let span = self.current_span();

        let symbol = match ch {
            '{' => Some(Token::LBrace),
            '}' => Some(Token::RBrace),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            ';' => Some(Token::Semicolon),
            _ => None,
        };
        if let Some(token) = symbol {
            self.advance();
            return Ok(SpannedToken { token, span });
        }

        match ch {
            '"' | '\'' => self.read_string(ch, span),
            '-' if self.peek_ahead(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_integer(span)
            }
            c if c.is_ascii_digit() => self.read_integer(span),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.read_identifier(span)),
            _ => Err(Error::schema(format!(
                "Unexpected character '{}' at {}",
                ch, span
            ))),
        }
    }

    // ── String literals ────────────────────────────────────

    fn read_string(&mut self, quote: char, span: Span) -> Result<SpannedToken> {
        self.advance(); // opening quote
        let mut value = String::new();

        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(Error::schema(format!(
                        "Unterminated string starting at {}",
                        span
                    )));
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.advance() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('\\') => value.push('\\'),
                    Some('"') => value.push('"'),
                    Some('\'') => value.push('\''),
                    Some(c) => {
                        return Err(Error::schema(format!(
                            "Invalid escape sequence '\\{}' at {}",
                            c,
                            self.current_span()
                        )));
                    }
                    None => {
                        return Err(Error::schema(format!(
                            "Unterminated escape sequence at {}",
                            self.current_span()
                        )));
                    }
                },
                Some(c) => value.push(c),
            }
        }

        Ok(SpannedToken {
            token: Token::StringLiteral(value),
            span,
        })
    }

    // ── Numbers ────────────────────────────────────────────

    fn read_integer(&mut self, span: Span) -> Result<SpannedToken> {
        let start = self.position;
        if self.peek() == Some('-') {
            self.advance();
        }

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        let val: i64 = text
            .parse()
            .map_err(|_| Error::schema(format!("Invalid integer '{}' at {}", text, span)))?;

        Ok(SpannedToken {
            token: Token::IntegerLiteral(val),
            span,
        })
    }

    // ── Identifiers ────────────────────────────────────────

    fn read_identifier(&mut self, span: Span) -> SpannedToken {
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        SpannedToken {
            token: Token::Identifier(text),
            span,
        }
    }
}
