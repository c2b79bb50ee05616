//! Variable environment: a stack of scopes with innermost-first lookup
//!
//! The bottom scope holds the program's globals and is never popped. Lambda
//! calls in stack mode push a scope for their parameters; in flat mode the
//! interpreter writes parameters straight into the globals and removes them
//! afterwards.

use indexmap::IndexMap;

use super::value::Value;

/// A named value together with its declared mutability
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub value: Value,
    pub mutable: bool,
}

impl Binding {
    pub fn new(value: Value, mutable: bool) -> Self {
        Self { value, mutable }
    }
}

type Scope = IndexMap<String, Binding>;

#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    /// Number of live scopes, globals included
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the innermost scope. The global scope stays.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Look up a binding, innermost scope first
    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.get(name).map(|binding| &binding.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `name` is bound in the innermost scope
    pub fn contains_local(&self, name: &str) -> bool {
        self.scopes
            .last()
            .is_some_and(|scope| scope.contains_key(name))
    }

    /// Bind `name` in the innermost scope, returning any binding it replaced
    pub fn define(&mut self, name: impl Into<String>, value: Value, mutable: bool) -> Option<Binding> {
        let name = name.into();
        tracing::trace!(%name, mutable, "define");
        self.scopes
            .last_mut()
            .and_then(|scope| scope.insert(name, Binding::new(value, mutable)))
    }

    /// Overwrite the value of the innermost binding of `name`, keeping its
    /// mutability. Returns false when nothing is bound under `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(binding) = scope.get_mut(name) {
                binding.value = value;
                return true;
            }
        }
        false
    }

    /// Remove the innermost binding of `name`
    pub fn remove(&mut self, name: &str) -> Option<Binding> {
        self.scopes
            .iter_mut()
            .rev()
            .find_map(|scope| scope.shift_remove(name))
    }

    /// Global bindings in declaration order
    pub fn globals(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.scopes
            .first()
            .into_iter()
            .flat_map(|scope| scope.iter().map(|(name, binding)| (name.as_str(), binding)))
    }

    /// Total number of bindings across all scopes
    pub fn len(&self) -> usize {
        self.scopes.iter().map(Scope::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
