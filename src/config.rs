//! Compilation options

/// Default number of spaces per indentation level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// Default limit on nested blocks
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Knobs shared by every backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    /// Spaces per indentation level in the generated code
    pub indent_width: usize,
    /// Maximum number of nested blocks before the input is rejected
    pub max_depth: usize,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            indent_width: DEFAULT_INDENT_WIDTH,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
