//! Error handling for pseudoc
//!
//! Every failure is fatal: the first error aborts the compilation and is
//! returned to the caller of [`crate::compile`]. Source-level errors carry
//! the span of the offending token for diagnostics.

mod diagnostic;

use std::ops::Range;
use thiserror::Error;

pub use diagnostic::{format_error, offset_to_line_col, print_error};

/// A span in the source code, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `offset`
    pub fn point(offset: usize) -> Self {
        Self::new(offset, offset)
    }

}

impl From<Range<usize>> for SourceSpan {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// The error type for every compilation stage
#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Lexing error: {message}")]
    Lexer { message: String, span: SourceSpan },

    #[error("Parse error: {message}")]
    Parser { message: String, span: SourceSpan },

    #[error("Unknown identifier: '{name}'")]
    Undeclared { name: String, span: SourceSpan },

    #[error("Re-declaration of identifier '{name}'")]
    Redeclaration {
        name: String,
        span: SourceSpan,
        /// Where the name is already declared
        previous: SourceSpan,
    },

    #[error("Re-assignment of CONSTANT '{name}'")]
    ConstantMutation { name: String, span: SourceSpan },

    #[error("Unknown type: '{name}'")]
    UnknownType { name: String, span: SourceSpan },

    #[error("Type error: {message}")]
    Type { message: String, span: SourceSpan },

    #[error("Unknown target '{name}' (available: python, cpp)")]
    UnknownTarget { name: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// Get the source span associated with this error, if any
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            CompileError::Lexer { span, .. }
            | CompileError::Parser { span, .. }
            | CompileError::Undeclared { span, .. }
            | CompileError::Redeclaration { span, .. }
            | CompileError::ConstantMutation { span, .. }
            | CompileError::UnknownType { span, .. }
            | CompileError::Type { span, .. } => Some(*span),
            CompileError::UnknownTarget { .. } | CompileError::Io(_) => None,
        }
    }

    /// A second location worth pointing at, with its label
    pub fn related(&self) -> Option<(SourceSpan, &'static str)> {
        match self {
            CompileError::Redeclaration { previous, .. } => Some((*previous, "first declared here")),
            _ => None,
        }
    }

    /// Short category label used as the diagnostic headline
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lexer { .. } => "Lexing error",
            CompileError::Parser { .. } => "Parse error",
            CompileError::Undeclared { .. } => "Undeclared identifier",
            CompileError::Redeclaration { .. } => "Redeclaration",
            CompileError::ConstantMutation { .. } => "Constant mutation",
            CompileError::UnknownType { .. } => "Unknown type",
            CompileError::Type { .. } => "Type error",
            CompileError::UnknownTarget { .. } => "Configuration error",
            CompileError::Io(_) => "IO error",
        }
    }

    pub fn lexer(message: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn undeclared(name: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::Undeclared {
            name: name.into(),
            span,
        }
    }

    pub fn redeclaration(name: impl Into<String>, span: SourceSpan, previous: SourceSpan) -> Self {
        CompileError::Redeclaration {
            name: name.into(),
            span,
            previous,
        }
    }

    pub fn constant_mutation(name: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::ConstantMutation {
            name: name.into(),
            span,
        }
    }

    pub fn unknown_type(name: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::UnknownType {
            name: name.into(),
            span,
        }
    }

    pub fn type_error(message: impl Into<String>, span: SourceSpan) -> Self {
        CompileError::Type {
            message: message.into(),
            span,
        }
    }
}

/// Result type alias for pseudoc operations
pub type CompileResult<T> = Result<T, CompileError>;
