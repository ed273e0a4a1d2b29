//! Render an AST back to surface syntax.
//!
//! Used by `impc source` and by the round-trip tests: formatting a freshly
//! parsed program and re-parsing the output yields a structurally equal
//! tree. A fully analyzed tree formats with its resolution visible
//! (`local[x]`, `global x;`), which is no longer parseable — that rendering
//! exists for inspection, not round-tripping.

use crate::ast::{ExprKind, Expression, Program, Scope, Stmt, StmtKind};
use crate::codegen::fmt_float;

pub fn format_program(program: &Program) -> String {
    let mut lines = Lines::new();
    for stmt in &program.statements {
        fmt_stmt(stmt, &mut lines);
    }
    lines.join()
}

pub fn fmt_expr(expr: &Expression) -> String {
    match &expr.kind {
        ExprKind::Name { name, scope } => match scope {
            Scope::Unresolved => name.clone(),
            Scope::Local => format!("local[{}]", name),
            Scope::Global => format!("global[{}]", name),
        },
        ExprKind::Integer(v) => v.to_string(),
        ExprKind::Float(v) => fmt_float(*v),
        ExprKind::Char(c) => format!("'{}'", escape_char(*c)),
        ExprKind::Boolean(b) => b.to_string(),
        ExprKind::BinOp { op, lhs, rhs } => {
            format!("{} {} {}", fmt_expr(lhs), op.symbol(), fmt_expr(rhs))
        }
        ExprKind::RelOp { op, lhs, rhs } => {
            format!("{} {} {}", fmt_expr(lhs), op.symbol(), fmt_expr(rhs))
        }
        ExprKind::LogicOp { op, lhs, rhs } => {
            format!("{} {} {}", fmt_expr(lhs), op.symbol(), fmt_expr(rhs))
        }
        ExprKind::Negation { expr } => format!("not {}", fmt_expr(expr)),
        ExprKind::UnaryOp { expr } => format!("-{}", fmt_expr(expr)),
        ExprKind::Parenthesis { expr } => format!("({})", fmt_expr(expr)),
        ExprKind::Call { name, args } => {
            let formatted: Vec<String> = args.iter().map(fmt_expr).collect();
            format!("{}({})", name, formatted.join(", "))
        }
        ExprKind::Error(_) => "<error>".to_string(),
    }
}

fn fmt_stmt(stmt: &Stmt, lines: &mut Lines) {
    match &stmt.kind {
        StmtKind::VarInit { name, init, .. } => {
            lines.push(format!("var {} = {};", name, fmt_expr(init)));
        }
        StmtKind::VarDecl { name, declared, scope } => match scope {
            Scope::Unresolved => lines.push(format!("var {} {};", name, declared.name())),
            Scope::Local => lines.push(format!("local {};", name)),
            Scope::Global => lines.push(format!("global {};", name)),
        },
        StmtKind::Assign { target, value } => {
            lines.push(format!("{} = {};", fmt_expr(target), fmt_expr(value)));
        }
        StmtKind::Print { expr } => {
            lines.push(format!("print {};", fmt_expr(expr)));
        }
        StmtKind::While { condition, body } => {
            lines.push(format!("while {} {{", fmt_expr(condition)));
            lines.indent();
            for s in body {
                fmt_stmt(s, lines);
            }
            lines.dedent();
            lines.push("}".to_string());
        }
        StmtKind::Branch { condition, body, orelse } => {
            lines.push(format!("if {} {{", fmt_expr(condition)));
            lines.indent();
            for s in body {
                fmt_stmt(s, lines);
            }
            lines.dedent();
            if !orelse.is_empty() {
                lines.push("} else {".to_string());
                lines.indent();
                for s in orelse {
                    fmt_stmt(s, lines);
                }
                lines.dedent();
            }
            lines.push("}".to_string());
        }
        StmtKind::Function { name, params, ret, body } => {
            let formatted: Vec<String> = params
                .iter()
                .map(|p| format!("{} {}", p.name, p.ty.name()))
                .collect();
            lines.push(format!(
                "func {}({}) {} {{",
                name,
                formatted.join(", "),
                ret.name()
            ));
            lines.indent();
            for s in body {
                fmt_stmt(s, lines);
            }
            lines.dedent();
            lines.push("}".to_string());
        }
        StmtKind::Return { expr } => {
            lines.push(format!("return {};", fmt_expr(expr)));
        }
        StmtKind::Break => lines.push("break;".to_string()),
        StmtKind::ExprStmt { expr } => lines.push(format!("{};", fmt_expr(expr))),
    }
}

fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        '\r' => "\\r".to_string(),
        '\0' => "\\0".to_string(),
        other => other.to_string(),
    }
}

struct Lines {
    lines: Vec<String>,
    depth: usize,
}

impl Lines {
    fn new() -> Self {
        Self { lines: Vec::new(), depth: 0 }
    }

    fn push(&mut self, line: String) {
        self.lines.push(format!("{}{}", "    ".repeat(self.depth), line));
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        self.depth -= 1;
    }

    fn join(&self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}
