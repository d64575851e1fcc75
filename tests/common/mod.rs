#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rox::error::{LoxError, Result};
use rox::Lox;

/// An output sink the test can read back after the interpreter wrote to it.
#[derive(Clone, Default)]
pub struct Capture(Rc<RefCell<Vec<u8>>>);

impl Capture {
    pub fn lines(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.0.borrow())
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `source` on a fresh driver, returning printed lines and the outcome.
pub fn run(source: &str) -> (Vec<String>, Result<()>) {
    let capture = Capture::default();
    let mut lox = Lox::with_output(Box::new(capture.clone()));
    let result = lox.run(source);
    (capture.lines(), result)
}

/// Run `source`, asserting it succeeds, and return what it printed.
pub fn output(source: &str) -> Vec<String> {
    let (lines, result) = run(source);
    if let Err(e) = result {
        panic!("program failed: {}\noutput so far: {:?}", e, lines);
    }
    lines
}

/// Messages of every static error reported for `source`.
pub fn static_errors(source: &str) -> Vec<String> {
    match run(source).1 {
        Err(LoxError::Static(diagnostics)) => diagnostics.iter().map(|e| e.to_string()).collect(),
        other => panic!("expected static errors, got {:?}", other),
    }
}
