//! Byte-level lexer.
//!
//! [`Scanner`] is an iterator of `Result<Token>`: a bad character or an
//! unterminated string yields one `Err` and scanning carries on from the next
//! byte, so a single pass reports every lexical error.  The last item is
//! always an `EOF` token.  [`scan_all`] drains a scanner for the driver,
//! routing errors into a [`Diagnostics`] collector.
//!
//! ```rust
//! use rox::scanner::Scanner;
//!
//! let kinds: Vec<&str> = Scanner::new(b"print 1; // done")
//!     .filter_map(Result::ok)
//!     .map(|token| token.kind_name())
//!     .collect();
//!
//! assert_eq!(kinds, ["PRINT", "NUMBER", "SEMICOLON", "EOF"]);
//! ```

use std::iter::FusedIterator;

use log::{debug, info};
use memchr::memchr;
use phf::phf_map;

use crate::error::{Diagnostics, LoxError, Result};
use crate::token::{Token, TokenType};

static KEYWORDS: phf::Map<&'static [u8], TokenType> = phf_map! {
    b"and"    => TokenType::AND,
    b"class"  => TokenType::CLASS,
    b"else"   => TokenType::ELSE,
    b"false"  => TokenType::FALSE,
    b"fun"    => TokenType::FUN,
    b"for"    => TokenType::FOR,
    b"if"     => TokenType::IF,
    b"nil"    => TokenType::NIL,
    b"or"     => TokenType::OR,
    b"print"  => TokenType::PRINT,
    b"return" => TokenType::RETURN,
    b"super"  => TokenType::SUPER,
    b"this"   => TokenType::THIS,
    b"true"   => TokenType::TRUE,
    b"var"    => TokenType::VAR,
    b"while"  => TokenType::WHILE,
};

pub struct Scanner<'src> {
    source: &'src [u8],
    /// First byte of the lexeme being scanned.
    start: usize,
    /// Next unread byte.
    pos: usize,
    line: usize,
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src [u8]) -> Self {
        info!("Scanner created over {} bytes", source.len());

        Self {
            source,
            start: 0,
            pos: 0,
            line: 1,
            finished: false,
        }
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek_at(0)?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
        }
        Some(byte)
    }

    fn bump_if(&mut self, expected: u8) -> bool {
        let matched = self.peek_at(0) == Some(expected);
        if matched {
            self.pos += 1;
        }
        matched
    }

    fn bump_while(&mut self, keep: impl Fn(u8) -> bool) {
        while self.peek_at(0).is_some_and(&keep) {
            self.bump();
        }
    }

    /// Step over whitespace, newlines and `//` comments.
    fn skip_trivia(&mut self) {
        loop {
            match (self.peek_at(0), self.peek_at(1)) {
                (Some(b' ' | b'\r' | b'\t' | b'\n'), _) => {
                    self.bump();
                }
                (Some(b'/'), Some(b'/')) => {
                    // the newline itself is left for the next iteration
                    let rest = &self.source[self.pos..];
                    self.pos += memchr(b'\n', rest).unwrap_or(rest.len());
                }
                _ => return,
            }
        }
    }

    /// `long` if the next byte is `=`, otherwise `short`.
    fn with_equals(&mut self, long: TokenType, short: TokenType) -> TokenType {
        if self.bump_if(b'=') {
            long
        } else {
            short
        }
    }

    fn token_type(&mut self, first: u8) -> Result<TokenType> {
        let token_type = match first {
            b'(' => TokenType::LEFT_PAREN,
            b')' => TokenType::RIGHT_PAREN,
            b'{' => TokenType::LEFT_BRACE,
            b'}' => TokenType::RIGHT_BRACE,
            b',' => TokenType::COMMA,
            b'.' => TokenType::DOT,
            b'-' => TokenType::MINUS,
            b'+' => TokenType::PLUS,
            b';' => TokenType::SEMICOLON,
            b'*' => TokenType::STAR,
            b'/' => TokenType::SLASH,
            b'!' => self.with_equals(TokenType::BANG_EQUAL, TokenType::BANG),
            b'=' => self.with_equals(TokenType::EQUAL_EQUAL, TokenType::EQUAL),
            b'<' => self.with_equals(TokenType::LESS_EQUAL, TokenType::LESS),
            b'>' => self.with_equals(TokenType::GREATER_EQUAL, TokenType::GREATER),
            b'"' => self.string()?,
            b'0'..=b'9' => self.number(),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.word(),
            other => {
                return Err(LoxError::lex(
                    self.line,
                    format!("Unexpected character: {}", other as char),
                ))
            }
        };

        Ok(token_type)
    }

    /// Strings may span lines; the token is reported on the closing line.
    fn string(&mut self) -> Result<TokenType> {
        self.bump_while(|b| b != b'"');

        if !self.bump_if(b'"') {
            return Err(LoxError::lex(self.line, "Unterminated string."));
        }

        let body = &self.source[self.start + 1..self.pos - 1];
        Ok(TokenType::STRING(String::from_utf8_lossy(body).into_owned()))
    }

    fn number(&mut self) -> TokenType {
        self.bump_while(|b| b.is_ascii_digit());

        let has_fraction =
            self.peek_at(0) == Some(b'.') && self.peek_at(1).is_some_and(|b| b.is_ascii_digit());
        if has_fraction {
            self.pos += 1;
            self.bump_while(|b| b.is_ascii_digit());
        }

        // ASCII digits with at most one interior '.', always a valid f64
        let value = std::str::from_utf8(self.lexeme_bytes())
            .ok()
            .and_then(|text| text.parse::<f64>().ok())
            .unwrap_or_default();

        TokenType::NUMBER(value)
    }

    fn word(&mut self) -> TokenType {
        self.bump_while(|b| b.is_ascii_alphanumeric() || b == b'_');

        KEYWORDS
            .get(self.lexeme_bytes())
            .cloned()
            .unwrap_or(TokenType::IDENTIFIER)
    }

    fn lexeme_bytes(&self) -> &'src [u8] {
        &self.source[self.start..self.pos]
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        self.skip_trivia();
        self.start = self.pos;

        let Some(first) = self.bump() else {
            self.finished = true;
            return Some(Ok(Token::new(TokenType::EOF, "", self.line)));
        };

        let scanned = self.token_type(first).map(|token_type| {
            let lexeme = String::from_utf8_lossy(self.lexeme_bytes());
            debug!("Scanned {} '{}' on line {}", token_type.name(), lexeme, self.line);
            Token::new(token_type, lexeme, self.line)
        });

        Some(scanned)
    }
}

impl FusedIterator for Scanner<'_> {}

/// Scan all of `source`.  Lexical errors go to `diagnostics`; the returned
/// tokens always end with `EOF`.
pub fn scan_all(source: &[u8], diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let before = diagnostics.len();

    for scanned in Scanner::new(source) {
        match scanned {
            Ok(token) => tokens.push(token),
            Err(e) => diagnostics.push(e),
        }
    }

    info!(
        "Scanned {} token(s) with {} error(s)",
        tokens.len(),
        diagnostics.len() - before
    );

    tokens
}
