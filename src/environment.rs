use crate::error::RuntimeError;
use crate::token::Token;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::debug;

/// Environments are shared between the interpreter and every closure created
/// inside them.  Only children point at parents, so plain `Rc` never cycles.
pub type SharedEnv = Rc<RefCell<Environment>>;

#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<SharedEnv>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enclosing(enclosing: SharedEnv) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn shared(self) -> SharedEnv {
        Rc::new(RefCell::new(self))
    }

    /// Insert or overwrite `name` in this scope only.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Nearest binding of `name`, walking outwards.
    pub fn get(&self, name: &Token) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(&name.lexeme) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name)
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }

    /// Overwrite the nearest existing binding of `name`.  Never creates one.
    pub fn assign(&mut self, name: &Token, value: Value) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(&name.lexeme) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value)
        } else {
            Err(RuntimeError::undefined_variable(name))
        }
    }

    /// The scope exactly `distance` parent hops above `env`.
    pub fn ancestor(env: &SharedEnv, distance: usize) -> Option<SharedEnv> {
        let mut current: SharedEnv = env.clone();
        for _ in 0..distance {
            let parent = current.borrow().enclosing.clone()?;
            current = parent;
        }
        Some(current)
    }

    /// Read `name` from the scope `distance` hops up, without searching
    /// further.  The resolver guarantees the binding is there; a miss is
    /// reported as an undefined variable rather than a panic.
    pub fn get_at(env: &SharedEnv, distance: usize, name: &Token) -> Result<Value, RuntimeError> {
        let scope = Self::ancestor(env, distance).ok_or_else(|| {
            debug!("No scope at distance {} for '{}'", distance, name.lexeme);
            RuntimeError::undefined_variable(name)
        })?;

        let value = scope.borrow().values.get(&name.lexeme).cloned();
        value.ok_or_else(|| RuntimeError::undefined_variable(name))
    }

    pub fn assign_at(
        env: &SharedEnv,
        distance: usize,
        name: &Token,
        value: Value,
    ) -> Result<(), RuntimeError> {
        let scope = Self::ancestor(env, distance)
            .ok_or_else(|| RuntimeError::undefined_variable(name))?;

        let mut scope = scope.borrow_mut();
        match scope.values.get_mut(&name.lexeme) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RuntimeError::undefined_variable(name)),
        }
    }
}
