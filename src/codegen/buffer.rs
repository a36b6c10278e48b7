//! Two-region output buffer
//!
//! Generated text goes either to the header (imports and the entry-point
//! opening) or to the body. Each line is prefixed with `indent` repetitions
//! of the indent unit unless an explicit depth is given. The buffer does not
//! check that `indent` is balanced; the translator owns that invariant.

use std::io::{self, Write};

/// Accumulates generated code until the compilation succeeds
#[derive(Debug, Clone)]
pub struct EmitBuffer {
    header: String,
    body: String,
    unit: String,
    /// Current indentation depth, adjusted around every nested block
    pub indent: usize,
}

impl EmitBuffer {
    /// Create a buffer indenting with `indent_width` spaces per level
    pub fn new(indent_width: usize) -> Self {
        Self {
            header: String::new(),
            body: String::new(),
            unit: " ".repeat(indent_width),
            indent: 0,
        }
    }

    fn push_indent(out: &mut String, unit: &str, depth: usize) {
        for _ in 0..depth {
            out.push_str(unit);
        }
    }

    /// Append `text` to the body at the current depth, without a newline
    pub fn emit(&mut self, text: &str) {
        self.emit_at(text, self.indent);
    }

    /// Append `text` to the body at an explicit depth, without a newline
    pub fn emit_at(&mut self, text: &str, depth: usize) {
        Self::push_indent(&mut self.body, &self.unit, depth);
        self.body.push_str(text);
    }

    /// Append a full line to the body at the current depth
    pub fn emit_line(&mut self, text: &str) {
        self.emit_line_at(text, self.indent);
    }

    /// Append a full line to the body at an explicit depth
    ///
    /// Empty lines are written without indentation.
    pub fn emit_line_at(&mut self, text: &str, depth: usize) {
        if !text.is_empty() {
            Self::push_indent(&mut self.body, &self.unit, depth);
            self.body.push_str(text);
        }
        self.body.push('\n');
    }

    /// Append a full line to the header at the current depth
    pub fn header_line(&mut self, text: &str) {
        if !text.is_empty() {
            Self::push_indent(&mut self.header, &self.unit, self.indent);
            self.header.push_str(text);
        }
        self.header.push('\n');
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Header followed by body
    pub fn contents(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.body.len());
        out.push_str(&self.header);
        out.push_str(&self.body);
        out
    }

    /// Write header then body to `sink` in a single write
    pub fn flush<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        sink.write_all(self.contents().as_bytes())?;
        sink.flush()
    }

    pub fn into_string(self) -> String {
        let mut out = self.header;
        out.push_str(&self.body);
        out
    }
}

impl Default for EmitBuffer {
    fn default() -> Self {
        Self::new(4)
    }
}
