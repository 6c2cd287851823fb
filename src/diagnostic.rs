//! Diagnostic sink for one run.
//!
//! Every lex, parse and runtime error reported while handling a unit of source
//! lands here, in report order.  A `Diagnostics` value is created per run and
//! handed back to the caller, so independent runs never share error state.

use log::debug;

use crate::error::LoxError;

/// Ordered record of the errors reported during one run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    errors: Vec<LoxError>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error.
    pub fn report(&mut self, error: LoxError) {
        debug!("Diagnostic reported: {}", error);

        self.errors.push(error);
    }

    /// Was any lex or parse error reported?
    pub fn had_error(&self) -> bool {
        self.errors.iter().any(LoxError::is_static)
    }

    /// Was a runtime error reported?
    pub fn had_runtime_error(&self) -> bool {
        self.errors.iter().any(|e| !e.is_static())
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// All reported errors in the order they were reported.
    pub fn errors(&self) -> impl Iterator<Item = &LoxError> {
        self.errors.iter()
    }
}

impl Extend<LoxError> for Diagnostics {
    fn extend<T: IntoIterator<Item = LoxError>>(&mut self, iter: T) {
        for error in iter {
            self.report(error);
        }
    }
}
