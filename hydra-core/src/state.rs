//! The scope stack and execution cursor.
//!
//! Scopes nest lexically: the global scope sits at index 0 and is never
//! removed, loops push a scope for the loop variable and one per iteration
//! for the body, and curve built-ins push a scope for the hidden cursor
//! `_p`. Lookups search from the innermost scope outwards.

use std::collections::HashMap;
use std::fmt;

use crate::error::{ErrorKind, HydraError};
use crate::types::Value;

/// One level of variable bindings.
pub type Scope = HashMap<String, Value>;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a scope operation was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// The name is already bound in the current scope.
    Redefinition(String),
    /// The name is not bound in any open scope.
    Undefined(String),
    /// The binding found by lookup lives in a different scope than the one
    /// the caller meant to write.
    Shadowed {
        name: String,
        expected: usize,
        found: usize,
    },
    /// A vacuous value cannot be stored.
    NoValue(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redefinition(name) => write!(f, "Redefinition of '{name}'."),
            Self::Undefined(name) => write!(f, "Variable '{name}' is not defined."),
            Self::Shadowed {
                name,
                expected,
                found,
            } => write!(
                f,
                "Variable '{name}' is bound in scope {found}, not in scope {expected}."
            ),
            Self::NoValue(name) => write!(f, "Cannot bind '{name}' to a vacuous value."),
        }
    }
}

impl std::error::Error for StateError {}

impl From<StateError> for HydraError {
    fn from(err: StateError) -> Self {
        let kind = match err {
            StateError::Redefinition(_) => ErrorKind::Redefinition,
            StateError::Undefined(_) => ErrorKind::UndefinedVariable,
            StateError::Shadowed { .. } => ErrorKind::Internal,
            StateError::NoValue(_) => ErrorKind::NoValue,
        };
        Self::new(kind, err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Cursor
// ---------------------------------------------------------------------------

/// The statement currently being executed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: Option<usize>,
    pub text: Option<String>,
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Variable environments plus the execution cursor.
#[derive(Debug)]
pub struct State {
    scopes: Vec<Scope>,
    cursor: Cursor,
}

impl State {
    /// A state holding only the empty global scope.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
            cursor: Cursor::default(),
        }
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the current scope. Refuses, leaving the stack unchanged, when
    /// only the global scope remains.
    pub fn close_scope(&mut self) -> bool {
        if self.scopes.len() <= 1 {
            return false;
        }
        self.scopes.pop();
        true
    }

    /// Number of open scopes, including the global one.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Index of the innermost scope.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Bind `name` in the current scope, returning that scope's index.
    ///
    /// # Errors
    ///
    /// Fails if `name` is already bound in the current scope or `value` is
    /// vacuous.
    pub fn define(&mut self, name: &str, value: Value) -> Result<usize, StateError> {
        if value.is_vacuous() {
            return Err(StateError::NoValue(name.to_owned()));
        }
        let index = self.current_index();
        let scope = &mut self.scopes[index];
        if scope.contains_key(name) {
            return Err(StateError::Redefinition(name.to_owned()));
        }
        scope.insert(name.to_owned(), value);
        Ok(index)
    }

    /// Overwrite the binding of `name`, which must be the one visible from
    /// the current scope and must live in scope `index`.
    ///
    /// # Errors
    ///
    /// Fails if `name` is unbound, resolves to another scope, or `value` is
    /// vacuous.
    pub fn set(&mut self, name: &str, value: Value, index: usize) -> Result<(), StateError> {
        if value.is_vacuous() {
            return Err(StateError::NoValue(name.to_owned()));
        }
        let found = self
            .find(name)
            .ok_or_else(|| StateError::Undefined(name.to_owned()))?;
        if found != index {
            return Err(StateError::Shadowed {
                name: name.to_owned(),
                expected: index,
                found,
            });
        }
        self.scopes[found].insert(name.to_owned(), value);
        Ok(())
    }

    /// Find `name`, innermost scope first, with the index of its scope.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<(&Value, usize)> {
        self.scopes
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, scope)| scope.get(name).map(|v| (v, i)))
    }

    /// Find `name` in the current scope only.
    #[must_use]
    pub fn lookup_in_current(&self, name: &str) -> Option<&Value> {
        self.scopes.last().and_then(|scope| scope.get(name))
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.lookup(name).map(|(_, i)| i)
    }

    /// Scopes from global to innermost.
    pub fn scopes(&self) -> impl Iterator<Item = &Scope> {
        self.scopes.iter()
    }

    pub fn set_cursor(&mut self, line: Option<usize>, text: Option<String>) {
        self.cursor = Cursor { line, text };
    }

    #[must_use]
    pub const fn cursor(&self) -> &Cursor {
        &self.cursor
    }
}

impl Default for State {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
