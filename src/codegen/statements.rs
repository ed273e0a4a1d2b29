use crate::ast::{ExprKind, ScalarType, Scope, Stmt, StmtKind};

use super::{ir_type, result_type, scalar, slot, zero_value, Codegen};

impl Codegen {
    /// Lower one statement. `break_to` is the exit label of the innermost
    /// enclosing loop, threaded through so `break` knows where to jump.
    pub(crate) fn out_stmt(&mut self, stmt: &Stmt, break_to: Option<&str>) {
        match &stmt.kind {
            StmtKind::VarDecl { name, declared, scope } => match scope {
                Scope::Global => self.emit(format!(
                    "@{} = global {} {}",
                    name,
                    ir_type(*declared),
                    zero_value(*declared)
                )),
                Scope::Local => self.emit(format!("%{} = alloca {}", name, ir_type(*declared))),
                Scope::Unresolved => {
                    unreachable!("unresolved declaration reached code generation")
                }
            },

            StmtKind::VarInit { .. } => {
                unreachable!("declare-with-initializer survived deinitialization")
            }

            StmtKind::Assign { target, value } => {
                let res = self.res_expr(value);
                let ty = ir_type(scalar(target));
                let ExprKind::Name { name, scope } = &target.kind else {
                    unreachable!("assignment target is always a name")
                };
                self.emit(format!("store {} {}, {}* {}", ty, res, ty, slot(name, *scope)));
            }

            StmtKind::Print { expr } => {
                let res = self.res_expr(expr);
                let ty = ir_type(result_type(expr));
                let primitive = match result_type(expr) {
                    ScalarType::Int => "_print_int",
                    ScalarType::Float => "_print_float",
                    ScalarType::Char => "_print_char",
                    ScalarType::Bool => "_print_bool",
                };
                self.emit(format!("call i32 ({}) @{}({} {})", ty, primitive, ty, res));
            }

            StmtKind::While { condition, body } => {
                let test_label = self.gensym();
                let body_label = self.gensym();
                let exit_label = self.gensym();

                self.emit(format!("br label %{}", test_label));
                self.emit(format!("{}:", test_label));
                self.indent();
                let test = self.res_expr(condition);
                self.emit(format!(
                    "br i1 {}, label %{}, label %{}",
                    test, body_label, exit_label
                ));
                self.dedent();

                self.emit(format!("{}:", body_label));
                self.indent();
                for s in body {
                    self.out_stmt(s, Some(exit_label.as_str()));
                }
                if !ends_in_terminator(body) {
                    self.emit(format!("br label %{}", test_label));
                }
                self.dedent();

                self.emit(format!("{}:", exit_label));
            }

            StmtKind::Branch { condition, body, orelse } => {
                let test = self.res_expr(condition);
                let then_label = self.gensym();
                let else_label = self.gensym();
                let merge_label = self.gensym();

                self.emit(format!(
                    "br i1 {}, label %{}, label %{}",
                    test, then_label, else_label
                ));
                self.emit(format!("{}:", then_label));
                self.indent();
                for s in body {
                    self.out_stmt(s, break_to);
                }
                if !ends_in_terminator(body) {
                    self.emit(format!("br label %{}", merge_label));
                }
                self.dedent();

                self.emit(format!("{}:", else_label));
                self.indent();
                for s in orelse {
                    self.out_stmt(s, break_to);
                }
                if !ends_in_terminator(orelse) {
                    self.emit(format!("br label %{}", merge_label));
                }
                self.dedent();

                self.emit(format!("{}:", merge_label));
            }

            StmtKind::Function { name, params, ret, body } => {
                let header_params: Vec<String> = params
                    .iter()
                    .enumerate()
                    .map(|(n, p)| format!("{} %.a{}", ir_type(p.ty), n))
                    .collect();
                self.emit(format!(
                    "define {} @{}({}) {{",
                    ir_type(*ret),
                    name,
                    header_params.join(", ")
                ));
                self.indent();
                for (idx, param) in params.iter().enumerate() {
                    let ty = ir_type(param.ty);
                    self.emit(format!("%{} = alloca {}", param.name, ty));
                    self.emit(format!("store {} %.a{}, {}* %{}", ty, idx, ty, param.name));
                }
                for s in body {
                    self.out_stmt(s, None);
                }
                // Default return for a body that does not end in one.
                if !matches!(body.last().map(|s| &s.kind), Some(StmtKind::Return { .. })) {
                    self.emit(format!("ret {} {}", ir_type(*ret), zero_value(*ret)));
                }
                self.dedent();
                self.emit("}");
            }

            StmtKind::Return { expr } => {
                let res = self.res_expr(expr);
                self.emit(format!("ret {} {}", ir_type(scalar(expr)), res));
            }

            StmtKind::Break => {
                let label = break_to.expect("break with no enclosing loop reached code generation");
                self.emit(format!("br label %{}", label));
            }

            StmtKind::ExprStmt { expr } => {
                self.res_expr(expr);
            }
        }
    }
}

// A statement sequence that already ends in a block terminator must not be
// followed by another one in the same block.
fn ends_in_terminator(stmts: &[Stmt]) -> bool {
    matches!(
        stmts.last().map(|s| &s.kind),
        Some(StmtKind::Return { .. } | StmtKind::Break)
    )
}
