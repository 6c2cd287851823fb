//! One interpreter session: scan → parse → interpret, once per unit of source.
//!
//! The session keeps a single [`Interpreter`] alive, so variables defined by
//! one `run` are visible to the next (this is what the interactive prompt
//! relies on).  Each call returns its own [`Diagnostics`]; nothing carries
//! over between calls except the root scope.

use std::io::{self, Write};

use log::{debug, info};

use crate::diagnostic::Diagnostics;
use crate::interpreter::Interpreter;
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::value::Value;

pub struct Lox<W: Write> {
    interpreter: Interpreter<W>,
}

impl Lox<io::Stdout> {
    pub fn new() -> Self {
        Self {
            interpreter: Interpreter::new(),
        }
    }
}

impl Default for Lox<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Lox<W> {
    pub fn with_output(out: W) -> Self {
        Self {
            interpreter: Interpreter::with_output(out),
        }
    }

    pub fn into_output(self) -> W {
        self.interpreter.into_output()
    }

    /// Run one unit of source.  Any lex or parse error suppresses execution
    /// entirely; a runtime error stops the run at the failing statement.
    pub fn run(&mut self, source: &str) -> Diagnostics {
        info!("Running {} bytes of source", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let statements = Parser::new(&tokens, &mut diagnostics).parse();

        if diagnostics.had_error() {
            debug!("Static errors reported, skipping interpretation");
            return diagnostics;
        }

        if let Err(e) = self.interpreter.interpret(&statements) {
            diagnostics.report(e);
        }

        diagnostics
    }

    /// Parse `source` as a single expression and evaluate it in the session's
    /// root scope.
    pub fn evaluate(&mut self, source: &str) -> (Option<Value>, Diagnostics) {
        info!("Evaluating {} bytes of source as an expression", source.len());

        let mut diagnostics = Diagnostics::new();

        let tokens = Scanner::new(source).scan_tokens(&mut diagnostics);
        let expr = Parser::new(&tokens, &mut diagnostics).parse_expression();

        let expr = match expr {
            Some(expr) if !diagnostics.had_error() => expr,
            _ => return (None, diagnostics),
        };

        match self.interpreter.evaluate(&expr) {
            Ok(value) => (Some(value), diagnostics),
            Err(e) => {
                diagnostics.report(e);
                (None, diagnostics)
            }
        }
    }
}
