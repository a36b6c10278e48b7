//! C++ code generator
//!
//! Emits a brace-block program with everything inside `int main()`.

use super::{Backend, EmitBuffer, ForLoop};
use crate::analysis::VarType;

/// C++ backend
#[derive(Debug, Clone, Copy, Default)]
pub struct CppBackend;

impl CppBackend {
    fn type_name(ty: VarType) -> &'static str {
        match ty {
            VarType::Integer => "int",
            VarType::Boolean => "bool",
            VarType::Real => "double",
            VarType::String => "std::string",
            VarType::Char => "char",
        }
    }
}

impl Backend for CppBackend {
    fn language_name(&self) -> &'static str {
        "C++"
    }

    fn file_extension(&self) -> &'static str {
        "cpp"
    }

    fn prologue(&self, out: &mut EmitBuffer) {
        out.header_line("#include <iostream>");
        out.header_line("#include <string>");
        out.header_line("");
        out.header_line("int main() {");
    }

    fn exit_statement(&self, out: &mut EmitBuffer) {
        out.emit_line("return 0;");
    }

    fn close_program(&self, out: &mut EmitBuffer) {
        out.emit_line_at("}", 0);
    }

    fn bool_literal(&self, value: bool) -> &'static str {
        if value { "true" } else { "false" }
    }

    fn declare(&self, out: &mut EmitBuffer, name: &str, ty: VarType) {
        let init = if ty == VarType::Integer { " = 0" } else { "" };
        out.emit_line(&format!("{} {}{};", Self::type_name(ty), name, init));
    }

    fn constant(&self, out: &mut EmitBuffer, name: &str, value: &str) {
        out.emit_line(&format!("const auto {} = {};", name, value));
    }

    fn assign(&self, out: &mut EmitBuffer, name: &str, value: &str) {
        out.emit_line(&format!("{} = {};", name, value));
    }

    fn output_text(&self, out: &mut EmitBuffer, text: &str) {
        out.emit_line(&format!("std::cout << \"{}\" << std::endl;", text));
    }

    fn output_expr(&self, out: &mut EmitBuffer, expr: &str) {
        out.emit_line(&format!("std::cout << {} << std::endl;", expr));
    }

    fn input(&self, out: &mut EmitBuffer, name: &str, ty: VarType, fresh: bool) {
        if fresh {
            out.emit_line(&format!("{} {};", Self::type_name(ty), name));
        }
        out.emit_line(&format!("std::cin >> {};", name));
    }

    fn open_if(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("if ({}) {{", cond));
    }

    fn open_else_if(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("}} else if ({}) {{", cond));
    }

    fn open_else(&self, out: &mut EmitBuffer) {
        out.emit_line("} else {");
    }

    fn close_if(&self, out: &mut EmitBuffer) {
        out.emit_line("}");
    }

    fn open_while(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("while ({}) {{", cond));
    }

    fn close_while(&self, out: &mut EmitBuffer) {
        out.emit_line("}");
    }

    fn open_for(&self, out: &mut EmitBuffer, header: &ForLoop<'_>) {
        let var = header.var;
        let init = if header.declares_var {
            format!("int {} = {}", var, header.start)
        } else {
            format!("{} = {}", var, header.start)
        };
        let (cond, update) = match header.step {
            None => (format!("{} <= {}", var, header.end), format!("{}++", var)),
            Some(step) => (
                format!(
                    "({} > 0 ? {} <= {} : {} >= {})",
                    step, var, header.end, var, header.end
                ),
                format!("{} += {}", var, step),
            ),
        };
        out.emit_line(&format!("for ({}; {}; {}) {{", init, cond, update));
    }

    fn close_for(&self, out: &mut EmitBuffer) {
        out.emit_line("}");
    }

    fn open_repeat(&self, out: &mut EmitBuffer) {
        out.emit_line("do {");
    }

    fn close_repeat(&self, out: &mut EmitBuffer, cond: &str) {
        out.emit_line(&format!("}} while (!({}));", cond));
    }
}
