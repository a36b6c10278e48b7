//! pseudoc - structured pseudocode to Python / C++ compiler
//!
//! This crate translates an exam-style pseudocode dialect (typed
//! declarations, conditionals, counted and conditional loops, console I/O)
//! into Python or C++ source. Translation is a single syntax-directed pass:
//! the parser writes target code as it recognises each production while a
//! block-scoped symbol table enforces declaration and constant rules.

use std::io::Write;

pub mod analysis;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod translator;

// Re-export commonly used types
pub use codegen::{Backend, CppBackend, EmitBuffer, PythonBackend, Target};
pub use config::CompileOptions;
pub use errors::{CompileError, CompileResult, SourceSpan};
pub use lexer::{Keyword, Lexer, Token, TokenKind};
pub use translator::Translator;

/// Compile `source` for `target`
///
/// Returns the complete generated program, or the first error encountered.
/// Nothing is produced on failure.
pub fn compile(source: &str, target: Target, options: &CompileOptions) -> CompileResult<String> {
    match target {
        Target::Python => Translator::new(source, PythonBackend, options)?.translate(),
        Target::Cpp => Translator::new(source, CppBackend, options)?.translate(),
    }
}

/// Compile `source` for `target` and write the program to `sink`
///
/// The sink is only written once the whole program has been translated.
pub fn compile_to<W: Write>(
    source: &str,
    target: Target,
    options: &CompileOptions,
    sink: &mut W,
) -> CompileResult<()> {
    match target {
        Target::Python => Translator::new(source, PythonBackend, options)?.translate_to(sink),
        Target::Cpp => Translator::new(source, CppBackend, options)?.translate_to(sink),
    }
}
