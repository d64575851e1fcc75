//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! Two tiers exist.  *Static* errors (scanner, parser, resolver) are collected
//! into a [`Diagnostics`] value and inspected once by the driver before any
//! code runs.  *Runtime* errors ([`RuntimeError`]) abort the current top‑level
//! statement sequence and bubble up to the driver.  Both fold into
//! [`LoxError`], which gives the crate a uniform `Result<T>` alias and plays
//! well with `anyhow` in the binary.
//!
//! The module **does not** print diagnostics itself.

use std::fmt;
use std::io;
use thiserror::Error;

use log::info;

use crate::token::{Token, TokenType};

/// Canonical error type used throughout the interpreter.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoxError {
    /// Lexical (scanner) error with source line information.
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Human‑readable description.
        message: String,

        /// 1‑based line where the error occurred.
        line: usize,
    },

    /// Syntactic (parser) error.  `location` is either empty, ` at end` or
    /// ` at 'lexeme'`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        location: String,
        line: usize,
    },

    /// Static‑analysis failure raised by the resolver.
    #[error("[line {line}] Error{location}: {message}")]
    Resolve {
        message: String,
        location: String,
        line: usize,
    },

    /// Every static error found in one run; nothing was executed.
    #[error("{0}")]
    Static(Diagnostics),

    /// Runtime evaluation error.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl LoxError {
    /// Helper constructor for the **scanner**.
    pub fn lex<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Lex error: line={}, msg={}", line, message);

        LoxError::Lex { message, line }
    }

    /// Helper constructor for the **parser**.
    pub fn parse<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Parse error: line={}, msg={}", token.line, message);

        LoxError::Parse {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Helper constructor for the **resolver**.
    pub fn resolve<S: Into<String>>(token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Resolve error: line={}, msg={}", token.line, message);

        LoxError::Resolve {
            message,
            location: location_of(token),
            line: token.line,
        }
    }

    /// Process exit code a command‑line driver should use for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoxError::Lex { .. }
            | LoxError::Parse { .. }
            | LoxError::Resolve { .. }
            | LoxError::Static(_) => 65,
            LoxError::Runtime(RuntimeError::Io(_)) | LoxError::Io(_) => 74,
            LoxError::Runtime(_) => 70,
            LoxError::Utf8(_) => 65,
        }
    }
}

fn location_of(token: &Token) -> String {
    if token.token_type == TokenType::EOF {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}

/// Failures raised while executing a resolved program.
///
/// Every variant (apart from `Io`) carries the token the failure is
/// attributed to; the rendered form is `message\n[line N]`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RuntimeError {
    #[error("Undefined variable '{}'.\n[line {}]", .name.lexeme, .name.line)]
    UndefinedVariable { name: Token },

    /// Operand/operator mismatch, or a superclass that is not a class.
    #[error("{message}\n[line {}]", .token.line)]
    TypeError { token: Token, message: String },

    #[error("Can only call functions and classes.\n[line {}]", .paren.line)]
    NotCallable { paren: Token },

    #[error("Expected {expected} arguments but got {got}.\n[line {}]", .paren.line)]
    ArityMismatch {
        paren: Token,
        expected: usize,
        got: usize,
    },

    /// Calls nested deeper than the interpreter allows.
    #[error("Stack overflow.\n[line {}]", .paren.line)]
    StackOverflow { paren: Token },

    #[error("{message}\n[line {}]", .name.line)]
    NotAnInstance { name: Token, message: &'static str },

    #[error("Undefined property '{}'.\n[line {}]", .name.lexeme, .name.line)]
    UndefinedProperty { name: Token },

    /// A native capability rejected its arguments.
    #[error("{message}\n[line {}]", .token.line)]
    Native { token: Token, message: String },

    /// The output sink failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

impl RuntimeError {
    pub fn type_error<S: Into<String>>(token: &Token, msg: S) -> Self {
        RuntimeError::TypeError {
            token: token.clone(),
            message: msg.into(),
        }
    }

    pub fn undefined_variable(name: &Token) -> Self {
        RuntimeError::UndefinedVariable { name: name.clone() }
    }

    /// Source line the error is attributed to, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::UndefinedVariable { name }
            | RuntimeError::NotAnInstance { name, .. }
            | RuntimeError::UndefinedProperty { name } => Some(name.line),
            RuntimeError::TypeError { token, .. } | RuntimeError::Native { token, .. } => {
                Some(token.line)
            }
            RuntimeError::NotCallable { paren }
            | RuntimeError::ArityMismatch { paren, .. }
            | RuntimeError::StackOverflow { paren } => Some(paren.line),
            RuntimeError::Io(_) => None,
        }
    }
}

/// Collector for static errors.  Scanner, parser and resolver push into it;
/// the driver checks it once before interpretation starts.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: LoxError) {
        self.errors.push(error);
    }

    pub fn extend<I: IntoIterator<Item = LoxError>>(&mut self, errors: I) {
        self.errors.extend(errors);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LoxError> {
        self.errors.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl From<Vec<LoxError>> for Diagnostics {
    fn from(errors: Vec<LoxError>) -> Self {
        Self { errors }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
