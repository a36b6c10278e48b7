//! Code generation for pseudoc
//!
//! The grammar is walked once by the translator; everything that differs
//! between target languages lives behind the [`Backend`] trait. A backend
//! only knows how to spell fragments; it never consumes tokens or checks
//! symbols.

mod buffer;
mod cpp;
mod python;

pub use buffer::EmitBuffer;
pub use cpp::CppBackend;
pub use python::PythonBackend;

use std::fmt;
use std::str::FromStr;

use crate::analysis::VarType;
use crate::errors::CompileError;

/// A counted loop, already translated into target expressions
#[derive(Debug, Clone, Copy)]
pub struct ForLoop<'a> {
    pub var: &'a str,
    pub start: &'a str,
    /// Inclusive upper (or lower, for negative steps) bound
    pub end: &'a str,
    pub step: Option<&'a str>,
    /// Whether the loop introduces the variable (it was not declared before)
    pub declares_var: bool,
}

/// Target-language fragments used by the translator
///
/// `open_*` and `close_*` are called at the depth of the enclosing
/// statement; the translator raises `EmitBuffer::indent` by one for the
/// block body in between.
pub trait Backend {
    /// Name of the target language
    fn language_name(&self) -> &'static str;

    /// File extension of generated sources
    fn file_extension(&self) -> &'static str;

    /// Imports and the opening of the program entry point
    fn prologue(&self, out: &mut EmitBuffer);

    /// Normal-termination statement, emitted inside the entry point
    fn exit_statement(&self, out: &mut EmitBuffer);

    /// Closes the entry point, emitted at depth 0
    fn close_program(&self, out: &mut EmitBuffer);

    fn bool_literal(&self, value: bool) -> &'static str;

    /// Whether `INPUT` can read into a variable of this type
    fn can_read(&self, ty: VarType) -> bool {
        ty != VarType::Boolean
    }

    fn declare(&self, out: &mut EmitBuffer, name: &str, ty: VarType);
    fn constant(&self, out: &mut EmitBuffer, name: &str, value: &str);
    fn assign(&self, out: &mut EmitBuffer, name: &str, value: &str);

    /// Print a string literal verbatim
    fn output_text(&self, out: &mut EmitBuffer, text: &str);
    fn output_expr(&self, out: &mut EmitBuffer, expr: &str);

    /// Read a line into `name`; `fresh` means the read also declares it
    fn input(&self, out: &mut EmitBuffer, name: &str, ty: VarType, fresh: bool);

    fn open_if(&self, out: &mut EmitBuffer, cond: &str);
    fn open_else_if(&self, out: &mut EmitBuffer, cond: &str);
    fn open_else(&self, out: &mut EmitBuffer);
    fn close_if(&self, out: &mut EmitBuffer);

    fn open_while(&self, out: &mut EmitBuffer, cond: &str);
    fn close_while(&self, out: &mut EmitBuffer);

    fn open_for(&self, out: &mut EmitBuffer, header: &ForLoop<'_>);
    fn close_for(&self, out: &mut EmitBuffer);

    fn open_repeat(&self, out: &mut EmitBuffer);
    /// Ends a post-test loop that stops once `cond` holds
    fn close_repeat(&self, out: &mut EmitBuffer, cond: &str);

    /// Filler for a block body with no statements
    fn empty_block(&self, _out: &mut EmitBuffer) {}
}

/// The closed set of supported targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Python,
    Cpp,
}

impl Target {
    pub const ALL: [Target; 2] = [Target::Python, Target::Cpp];

    pub fn name(&self) -> &'static str {
        match self {
            Target::Python => "python",
            Target::Cpp => "cpp",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            Target::Python => PythonBackend.file_extension(),
            Target::Cpp => CppBackend.file_extension(),
        }
    }
}

impl FromStr for Target {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(Target::Python),
            "cpp" | "c++" | "cxx" => Ok(Target::Cpp),
            _ => Err(CompileError::UnknownTarget {
                name: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
