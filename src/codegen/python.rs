//! Python code generator
//!
//! Emits an indentation-block program wrapped in a `main()` function.
//! Python blocks cannot be empty, so bodies without statements get `pass`.

use super::{Backend, EmitBuffer, ForLoop};
use crate::analysis::VarType;

/// Python 3 backend
#[derive(Debug, Clone, Copy, Default)]
pub struct PythonBackend;

impl Backend for PythonBackend {
    fn language_name(&self) -> &'static str {
        "Python"
    }

    fn file_extension(&self) -> &'static str {
        "py"
    }

    fn prologue(&self, out: &mut EmitBuffer) {
        out.header_line("def main():");
    }

    fn exit_statement(&self, out: &mut EmitBuffer) {
        out.emit_line("return");
    }

    fn close_program(&self, out: &mut EmitBuffer) {
        out.emit_line("");
        out.emit_line("");
        out.emit_line_at("if __name__ == \"__main__\":", 0);
        out.emit_line_at("main()", 1);
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "True" } else { "False" }
    }

    fn declare(&self, out: &mut EmitBuffer, name: &str, ty: VarType) {
        // INTEGER starts at zero, as in C++.
        let init = if ty == VarType::Integer { "0" } else { "None" };
        out.emit_line(&format!("{} = {}  # {}", name, init, ty));
    }

    fn constant(&self, out: &mut EmitBuffer, name: &str, value: &str) {
        out.emit_line(&format!("{} = {}", name, value));
    }

    fn assign(&self, out: &mut EmitBuffer, name: &str, value: &str) {
        out.emit_line(&format!("{} = {}", name, value));
    }

    fn output_text(&self, out: &mut EmitBuffer, text: &str) {
        out.emit_line(&format!("print(\"{}\")", text));
    }

    fn output_expr(&self, out: &mut EmitBuffer, expr: &str) {
        out.emit_line(&format!("print({})", expr));
    }

    fn input(&self, out: &mut EmitBuffer, name: &str, ty: VarType, _fresh: bool) {
        let read = match ty {
            VarType::Integer => "int(input())",
            VarType::Real => "float(input())",
            VarType::Char => "input()[:1]",
            VarType::String | VarType::Boolean => "input()",
        };
        out.emit_line(&format!("{} = {}", name, read));
    }

    fn open_if(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("if {}:", cond));
    }

    fn open_else_if(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("elif {}:", cond));
    }

    fn open_else(&self, out: &mut EmitBuffer) {
        out.emit_line("else:");
    }

    fn close_if(&self, _out: &mut EmitBuffer) {}

    fn open_while(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("while {}:", cond));
    }

    fn close_while(&self, _out: &mut EmitBuffer) {}

    fn open_for(&self, out: &mut EmitBuffer, header: &ForLoop<'_>) {
        // range() excludes its stop value, so push it one past the bound
        // in the direction of travel.
        let range = match header.step {
            None => format!("range({}, {} + 1)", header.start, header.end),
            Some(step) => format!(
                "range({}, {} + (1 if {} > 0 else -1), {})",
                header.start, header.end, step, step
            ),
        };
        out.emit_line(&format!("for {} in {}:", header.var, range));
    }

    fn close_for(&self, _out: &mut EmitBuffer) {}

    fn open_repeat(&self, out: &mut EmitBuffer) {
        out.emit_line("while True:");
    }

    fn close_repeat(&self, out: &mut EmitBuffer, cond: &str) {
        let depth = out.indent;
        out.emit_line_at(&format!("if {}:", cond), depth + 1);
        out.emit_line_at("break", depth + 2);
    }

    fn empty_block(&self, out: &mut EmitBuffer) {
        out.emit_line("pass");
    }
}
