//! Lexical categories and the owned [`Token`] the scanner hands to the parser.

use serde::Serialize;
use std::fmt;
use std::mem;

/// Kind of a token.  String and number literals carry their decoded value;
/// `true`, `false` and `nil` are plain keywords.
///
/// Comparison ignores the payload: `NUMBER(1.0) == NUMBER(2.0)`, which is
/// what the parser wants when it asks "is the next token a number?".
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Serialize)]
pub enum TokenType {
    // punctuation
    LEFT_PAREN,
    RIGHT_PAREN,
    LEFT_BRACE,
    RIGHT_BRACE,
    COMMA,
    DOT,
    MINUS,
    PLUS,
    SEMICOLON,
    SLASH,
    STAR,

    // operators that may take a trailing '='
    BANG,
    BANG_EQUAL,
    EQUAL,
    EQUAL_EQUAL,
    GREATER,
    GREATER_EQUAL,
    LESS,
    LESS_EQUAL,

    // literals
    IDENTIFIER,
    STRING(String),
    NUMBER(f64),

    // keywords
    AND,
    CLASS,
    ELSE,
    FALSE,
    FUN,
    FOR,
    IF,
    NIL,
    OR,
    PRINT,
    RETURN,
    SUPER,
    THIS,
    TRUE,
    VAR,
    WHILE,

    EOF,
}

impl PartialEq for TokenType {
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

/// Expands to a match from every payload-free variant to its own name.
macro_rules! variant_names {
    ($value:expr, $($unit:ident)*) => {
        match $value {
            TokenType::STRING(_) => "STRING",
            TokenType::NUMBER(_) => "NUMBER",
            $(TokenType::$unit => stringify!($unit),)*
        }
    };
}

impl TokenType {
    /// Variant name without payload, e.g. `"NUMBER"` or `"LEFT_PAREN"`.
    pub fn name(&self) -> &'static str {
        variant_names!(self,
            LEFT_PAREN RIGHT_PAREN LEFT_BRACE RIGHT_BRACE COMMA DOT MINUS PLUS
            SEMICOLON SLASH STAR BANG BANG_EQUAL EQUAL EQUAL_EQUAL GREATER
            GREATER_EQUAL LESS LESS_EQUAL IDENTIFIER AND CLASS ELSE FALSE FUN
            FOR IF NIL OR PRINT RETURN SUPER THIS TRUE VAR WHILE EOF
        )
    }
}

/// One lexeme with its kind and source line.
///
/// The lexeme is owned: function bodies keep their tokens alive after the
/// source line they came from is gone (a REPL defines on one line and calls
/// on the next).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub line: usize,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: impl Into<String>, line: usize) -> Self {
        Self {
            token_type,
            lexeme: lexeme.into(),
            line,
        }
    }

    /// An identifier the interpreter looks up itself (`this`), attributed to
    /// `line` for error messages.
    pub fn synthetic(lexeme: &str, line: usize) -> Self {
        Self::new(TokenType::IDENTIFIER, lexeme, line)
    }

    pub fn kind_name(&self) -> &'static str {
        self.token_type.name()
    }
}

/// `KIND lexeme literal`, the line format of `rox tokenize`.  Numbers always
/// show a fractional part (`3` → `3.0`); tokens without a value show `null`.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ", self.kind_name(), self.lexeme)?;

        match &self.token_type {
            TokenType::STRING(s) => f.write_str(s),
            TokenType::NUMBER(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => {
                let mut digits = itoa::Buffer::new();
                write!(f, "{}.0", digits.format(*n as i64))
            }
            TokenType::NUMBER(n) => write!(f, "{}", n),
            _ => f.write_str("null"),
        }
    }
}
