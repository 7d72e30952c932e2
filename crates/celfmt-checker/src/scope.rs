//! Lexical scopes for identifier resolution.
//!
//! Comprehensions push a scope for their iteration and accumulator
//! variables, shadowing anything declared further out.

use std::collections::HashMap;

use celfmt_common::{CelType, VariableDecl};

/// Variables declared at one nesting level.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    variables: HashMap<String, VariableDecl>,
}

impl Scope {
    pub fn declare(&mut self, name: impl Into<String>, cel_type: CelType) {
        let name = name.into();
        self.variables
            .insert(name.clone(), VariableDecl::new(name, cel_type));
    }

    pub fn get(&self, name: &str) -> Option<&VariableDecl> {
        self.variables.get(name)
    }
}

/// Stack of scopes, innermost last. The root scope is never popped.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Pop the innermost scope. Returns None when only the root remains.
    pub fn exit_scope(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Declare a variable in the innermost scope.
    pub fn declare(&mut self, name: impl Into<String>, cel_type: CelType) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.declare(name, cel_type);
        }
    }

    /// Resolve a name from the innermost scope outwards.
    pub fn resolve(&self, name: &str) -> Option<&VariableDecl> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
