use crate::error::{LoxError, Result};
use crate::token::Token;
use crate::value::Value;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One lexical scope: name → value bindings plus a link to the enclosing
/// scope.  The link is only followed for lookup and assignment; a block's
/// scope is dropped when the block finishes while its parent lives on.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    /// A root scope with no parent.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    /// Bind `name` in this scope, replacing any binding it already has here.
    pub fn define(&mut self, name: &str, value: Value) {
        debug!("define {} = {}", name, value);

        self.values.insert(name.to_string(), value);
    }

    /// Look `name` up in this scope, then outward through the chain.
    pub fn get(&self, name: &Token<'_>) -> Result<Value> {
        if let Some(value) = self.values.get(name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(undefined(name))
        }
    }

    /// Overwrite the nearest existing binding of `name`.  Never declares.
    pub fn assign(&mut self, name: &Token<'_>, value: Value) -> Result<()> {
        if let Some(slot) = self.values.get_mut(name.lexeme) {
            debug!("assign {} = {}", name.lexeme, value);
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(undefined(name))
        }
    }
}

fn undefined(name: &Token<'_>) -> LoxError {
    LoxError::runtime(name.line, format!("Undefined variable '{}'.", name.lexeme))
}
