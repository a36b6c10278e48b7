//! Symbol tables and block scopes
//!
//! A stack of frames, one per open block. Lookups search from the innermost
//! frame outwards, and popping a frame discards everything declared inside
//! the block, which restores exactly the table that was live at block entry.

use std::collections::HashMap;

use super::types::VarType;
use crate::errors::{CompileError, CompileResult, SourceSpan};

/// The kind of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    /// A variable declared with a type (or implicitly by `INPUT` / `FOR`)
    Declared(VarType),
    /// An immutable name introduced by `CONSTANT`, typed by its initializer
    Constant(VarType),
}

/// A symbol in the symbol table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Source location where this symbol was introduced
    pub span: SourceSpan,
}

impl Symbol {
    pub fn declared(name: impl Into<String>, ty: VarType, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Declared(ty),
            span,
        }
    }

    pub fn constant(name: impl Into<String>, ty: VarType, span: SourceSpan) -> Self {
        Self {
            name: name.into(),
            kind: SymbolKind::Constant(ty),
            span,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, SymbolKind::Constant(_))
    }

    pub fn var_type(&self) -> VarType {
        match self.kind {
            SymbolKind::Declared(ty) | SymbolKind::Constant(ty) => ty,
        }
    }
}

/// The symbols declared directly inside one block
#[derive(Debug, Clone, Default)]
pub struct Scope {
    symbols: HashMap<String, Symbol>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    fn insert(&mut self, symbol: Symbol) {
        self.symbols.insert(symbol.name.clone(), symbol);
    }
}

/// A scope stack for tracking nested blocks during translation
#[derive(Debug)]
pub struct ScopeStack {
    /// Stack of scopes (innermost is last); never empty
    scopes: Vec<Scope>,
}

impl ScopeStack {
    /// Create a new scope stack with a program-level scope
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    /// Open a block
    pub fn push(&mut self) {
        self.scopes.push(Scope::new());
        tracing::trace!(depth = self.depth(), "scope pushed");
    }

    /// Close the innermost block, discarding its declarations
    ///
    /// The program-level scope is never popped.
    pub fn pop(&mut self) -> Option<Scope> {
        if self.scopes.len() > 1 {
            let scope = self.scopes.pop();
            tracing::trace!(depth = self.depth(), "scope popped");
            scope
        } else {
            None
        }
    }

    /// Number of open blocks (0 at program level)
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Define a symbol in the innermost scope
    ///
    /// Fails if the name is visible from here, whichever frame holds it.
    pub fn define(&mut self, symbol: Symbol) -> CompileResult<()> {
        if let Some(existing) = self.lookup(&symbol.name) {
            return Err(CompileError::redeclaration(
                symbol.name,
                symbol.span,
                existing.span,
            ));
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(symbol);
        }
        Ok(())
    }

    /// Look up a symbol by name, searching from innermost to outermost scope
    pub fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int(name: &str) -> Symbol {
        Symbol::declared(name, VarType::Integer, SourceSpan::default())
    }

    #[test]
    fn test_lookup_searches_outer_scopes() {
        let mut scopes = ScopeStack::new();
        scopes.define(int("x")).unwrap();
        scopes.push();
        scopes.define(int("y")).unwrap();

        assert!(scopes.contains("x"));
        assert!(scopes.contains("y"));
        assert_eq!(scopes.depth(), 1);
    }

    #[test]
    fn test_pop_restores_previous_table() {
        let mut scopes = ScopeStack::new();
        scopes.define(int("x")).unwrap();
        scopes.push();
        scopes.define(int("y")).unwrap();
        let popped = scopes.pop().unwrap();

        assert_eq!(popped.len(), 1);
        assert!(scopes.contains("x"));
        assert!(!scopes.contains("y"));

        // The name is free again once its block has closed.
        scopes.define(int("y")).unwrap();
    }

    #[test]
    fn test_visible_name_cannot_be_redeclared_in_inner_block() {
        let mut scopes = ScopeStack::new();
        scopes.define(int("x")).unwrap();
        scopes.push();

        let err = scopes
            .define(Symbol::constant("x", VarType::Integer, SourceSpan::new(4, 5)))
            .unwrap_err();
        match err {
            CompileError::Redeclaration { name, span, previous } => {
                assert_eq!(name, "x");
                assert_eq!(span, SourceSpan::new(4, 5));
                assert_eq!(previous, SourceSpan::default());
            }
            other => panic!("expected redeclaration, got {:?}", other),
        }
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut scopes = ScopeStack::new();
        assert!(scopes.pop().is_none());
        assert_eq!(scopes.depth(), 0);
    }

    #[test]
    fn test_symbol_kind() {
        let c = Symbol::constant("PI", VarType::Real, SourceSpan::default());
        assert!(c.is_constant());
        assert_eq!(c.var_type(), VarType::Real);
        assert!(!int("i").is_constant());
        assert_eq!(int("i").var_type(), VarType::Integer);
    }
}
