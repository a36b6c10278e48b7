//! Lexer module for pseudoc
//!
//! Hand-written lexer that tokenizes pseudocode source lazily.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Keyword, Token, TokenKind};
