//! `rox` ‑ a tree‑walking interpreter for Lox.
//!
//! Pipeline: [`scanner`] → [`parser`] → [`resolver`] → [`interpreter`].  The
//! [`Lox`] driver strings the stages together, gathers every static error
//! into [`Diagnostics`](error::Diagnostics) before anything runs, and keeps
//! interpreter state alive between runs so a REPL can build on earlier lines.

pub mod ast;
pub mod ast_printer;
pub mod class;
pub mod environment;
pub mod error;
pub mod function;
pub mod interpreter;
pub mod native;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stdlib;
pub mod token;
pub mod value;

use std::io::Write;

use log::{error, info};

use crate::ast::Stmt;
use crate::error::{Diagnostics, LoxError, Result};
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::resolver::Resolver;

pub struct Lox {
    interpreter: Interpreter,
    /// First expression id for the next parse; ids stay unique across runs.
    next_expr_id: usize,
}

impl Lox {
    /// A driver printing to stdout, with the prelude loaded.
    pub fn new() -> Self {
        Self::from_interpreter(Interpreter::new())
    }

    /// A driver whose `print` output goes to `out`.
    pub fn with_output(out: Box<dyn Write>) -> Self {
        Self::from_interpreter(Interpreter::with_output(out))
    }

    fn from_interpreter(interpreter: Interpreter) -> Self {
        let mut lox = Self {
            interpreter,
            next_expr_id: 0,
        };

        for part in stdlib::PRELUDE {
            if let Err(e) = lox.run(part) {
                error!("Failed to load prelude: {}", e);
            }
        }

        info!("Prelude loaded");
        lox
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    /// Scan and parse `source`, returning the program or every lexical and
    /// syntax error found.
    pub fn parse(&mut self, source: &str) -> Result<Vec<Stmt>> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scanner::scan_all(source.as_bytes(), &mut diagnostics);

        let mut parser = Parser::new(&tokens).starting_at(self.next_expr_id);
        let parsed = parser.parse();
        self.next_expr_id = parser.next_id();

        match parsed {
            Ok(statements) if diagnostics.is_empty() => Ok(statements),
            Ok(_) => Err(reject(diagnostics)),
            Err(parse_errors) => {
                diagnostics.extend(parse_errors);
                Err(reject(diagnostics))
            }
        }
    }

    /// Run `source` to completion.  Static errors (lexical, syntax,
    /// resolution) are all reported together and nothing executes; a runtime
    /// error stops the remaining top‑level statements.
    pub fn run(&mut self, source: &str) -> Result<()> {
        let statements = self.parse(source)?;

        let mut resolver = Resolver::new(&mut self.interpreter);
        if let Err(errors) = resolver.resolve(&statements) {
            return Err(reject(Diagnostics::from(errors)));
        }

        self.interpreter.interpret(&statements)?;
        Ok(())
    }
}

fn reject(diagnostics: Diagnostics) -> LoxError {
    info!("Rejected program with {} static error(s)", diagnostics.len());
    LoxError::Static(diagnostics)
}

impl Default for Lox {
    fn default() -> Self {
        Self::new()
    }
}
