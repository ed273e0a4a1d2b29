//! Textual IR emission.
//!
//! The generator walks a fully analyzed AST (typed, scope-resolved,
//! deinitialized, unscripted) and appends IR lines to a flat buffer.
//! Synthetic value/label names come from a counter owned by the generator
//! instance, so every compilation numbers from `.1` and repeated runs in one
//! process emit identical text.

mod expressions;
mod statements;

use crate::ast::{Expression, Program, ScalarType, Scope};

pub struct Codegen {
    lines: Vec<String>,
    depth: usize,
    counter: usize,
}

/// Lower a finished program to IR text.
pub fn generate_ir(program: &Program) -> String {
    Codegen::new().generate(program)
}

impl Codegen {
    pub fn new() -> Self {
        Self { lines: Vec::new(), depth: 0, counter: 0 }
    }

    pub fn generate(mut self, program: &Program) -> String {
        // Runtime print primitives, declared once per module.
        self.emit("declare i32 @_print_int(i32 %x)");
        self.emit("declare i32 @_print_float(double %x)");
        self.emit("declare i32 @_print_char(i32 %x)");
        self.emit("declare i32 @_print_bool(i1 %x)");
        for stmt in &program.statements {
            self.out_stmt(stmt, None);
        }
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }

    /// A fresh synthetic name like `.1`, `.2`, ... — never reused.
    pub(crate) fn gensym(&mut self) -> String {
        self.counter += 1;
        format!(".{}", self.counter)
    }

    pub(crate) fn emit(&mut self, line: impl AsRef<str>) {
        self.lines.push(format!("{}{}", "  ".repeat(self.depth), line.as_ref()));
    }

    pub(crate) fn indent(&mut self) {
        self.depth += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.depth -= 1;
    }
}

impl Default for Codegen {
    fn default() -> Self {
        Self::new()
    }
}

/// IR representation of a scalar type. Integers and chars share `i32`.
pub(crate) fn ir_type(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Int | ScalarType::Char => "i32",
        ScalarType::Float => "double",
        ScalarType::Bool => "i1",
    }
}

pub(crate) fn zero_value(ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Int | ScalarType::Char | ScalarType::Bool => "0",
        ScalarType::Float => "0.0",
    }
}

/// Float literal text LLVM accepts: always carries a decimal point.
pub(crate) fn fmt_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// The resolved type of an expression. Untyped expressions cannot reach code
/// generation; the pass pipeline rejects them first.
pub(crate) fn scalar(expr: &Expression) -> ScalarType {
    expr.ty
        .scalar()
        .expect("expression reached code generation untyped")
}

/// The type of the value an expression produces. Comparisons carry their
/// operand flavor as the tag (it selects the comparison family), but the
/// value they produce is a single bit.
pub(crate) fn result_type(expr: &Expression) -> ScalarType {
    use crate::ast::ExprKind;
    match expr.kind {
        ExprKind::RelOp { .. } | ExprKind::LogicOp { .. } | ExprKind::Negation { .. } => {
            ScalarType::Bool
        }
        _ => scalar(expr),
    }
}

/// The storage slot for a resolved name: `@name` for globals, `%name` for
/// locals.
pub(crate) fn slot(name: &str, scope: Scope) -> String {
    match scope {
        Scope::Global => format!("@{}", name),
        Scope::Local => format!("%{}", name),
        Scope::Unresolved => unreachable!("unresolved name reached code generation"),
    }
}
