//! Semantic bookkeeping for the translator
//!
//! The declared-type table and the block-scoped symbol stack that enforce
//! declaration-before-use, constant immutability and redeclaration rules
//! while the translator walks the grammar.

pub mod scope;
pub mod types;

pub use scope::{Scope, ScopeStack, Symbol, SymbolKind};
pub use types::VarType;
