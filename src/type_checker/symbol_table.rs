use log::trace;

use crate::ast::statements::DeclId;

/// A single scope: names in insertion order, each bound to its declaration.
#[derive(Debug, Default)]
struct Scope {
    entries: Vec<(String, DeclId)>,
}

impl Scope {
    /// The latest binding of `name` in this scope.
    fn lookup(&self, name: &str) -> Option<DeclId> {
        self.entries
            .iter()
            .rev()
            .find(|(entry, _)| entry == name)
            .map(|(_, decl)| *decl)
    }
}

/// LIFO stack of scopes. The outermost scope is the global one and is never popped.
#[derive(Debug)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        SymbolTable::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Nesting depth; 1 while only the global scope is open.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn open_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!("Opened scope at depth {}", self.depth());
    }

    pub fn close_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            trace!("Closed scope, back at depth {}", self.depth());
        }
    }

    /// Binds `name` in the innermost scope.
    ///
    /// Redeclaration checks are the caller's business; a later entry shadows an earlier one.
    pub fn insert(&mut self, name: &str, decl: DeclId) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.entries.push((name.to_string(), decl));
        }
    }

    /// Finds the innermost binding of `name`, searching outwards.
    pub fn retrieve(&self, name: &str) -> Option<DeclId> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(name))
    }

    /// Finds a binding of `name` in the innermost scope only.
    pub fn retrieve_one_level(&self, name: &str) -> Option<DeclId> {
        self.scopes.last().and_then(|scope| scope.lookup(name))
    }
}
