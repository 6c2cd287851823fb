//! Centralised error hierarchy for the **Lox interpreter**.
//!
//! The scanner, parser, environment and interpreter all convert their failure
//! modes into one of the variants defined here.  Every variant renders to the
//! exact line-tagged text the driver writes to the error channel, so callers
//! only ever need `eprintln!("{}", err)`.
//!
//! The module **does not** print diagnostics itself; see
//! [`Diagnostics`](crate::diagnostic::Diagnostics) for the sink that collects them.

use std::io;
use thiserror::Error;

use log::info;

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

    /// Syntactic (parser) error.
    ///
    /// `location` is already formatted: `" at 'x'"` or `" at end"`.
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        message: String,
        line: usize,
        location: String,
    },

    /// Runtime evaluation error, tagged with the line of the offending token.
    #[error("{message}\n[line {line}]")]
    Runtime { message: String, line: usize },

    /// Wrapper around `std::io::Error` (transparent).  Raised when `print`
    /// output cannot be written.
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

    /// Helper constructor for the **parser**.  `lexeme` is `None` when the
    /// offending token is the end marker.
    pub fn parse<S: Into<String>>(line: usize, lexeme: Option<&str>, msg: S) -> Self {
        let message: String = msg.into();
        let location: String = match lexeme {
            Some(lexeme) => format!(" at '{}'", lexeme),
            None => " at end".to_string(),
        };

        info!(
            "Creating Parse error: line={}, location={}, msg={}",
            line, location, message
        );

        LoxError::Parse {
            message,
            line,
            location,
        }
    }

    /// Helper constructor for the **interpreter** and **environment**.
    pub fn runtime<S: Into<String>>(line: usize, msg: S) -> Self {
        let message: String = msg.into();

        info!("Creating Runtime error: line={}, msg={}", line, message);

        LoxError::Runtime { message, line }
    }

    /// `true` for errors found before execution starts (lexing and parsing).
    /// Any static error suppresses interpretation of the whole run.
    pub fn is_static(&self) -> bool {
        matches!(self, LoxError::Lex { .. } | LoxError::Parse { .. })
    }

    /// The bare message without line decoration.
    pub fn message(&self) -> String {
        match self {
            LoxError::Lex { message, .. }
            | LoxError::Parse { message, .. }
            | LoxError::Runtime { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, LoxError>;
