//! Flow-sensitive type checking: return placement and type, break placement.
//!
//! Runs on a fully type-assigned AST. All violations found in one traversal
//! are reported together.

use crate::ast::{Program, ScalarType, Stmt, StmtKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::walk::{walk_program, Rewritten, Transform};

use super::Pass;

pub struct CheckTypes {
    in_function: bool,
    ret_type: Option<ScalarType>,
    loop_depth: usize,
    errors: Vec<Diagnostic>,
    source: String,
    fname: String,
}

impl CheckTypes {
    pub fn new() -> Self {
        Self {
            in_function: false,
            ret_type: None,
            loop_depth: 0,
            errors: Vec::new(),
            source: String::new(),
            fname: String::new(),
        }
    }

    fn error(&mut self, kind: DiagnosticKind, message: String, loc: crate::ast::SourceLoc) {
        self.errors.push(Diagnostic::from_loc(
            kind,
            message,
            &self.fname,
            &self.source,
            loc,
        ));
    }
}

impl Default for CheckTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for CheckTypes {
    fn pre_stmt(&mut self, stmt: Stmt) -> Stmt {
        match &stmt.kind {
            StmtKind::Function { ret, .. } => {
                self.in_function = true;
                self.ret_type = Some(*ret);
            }
            StmtKind::While { .. } => {
                self.loop_depth += 1;
            }
            _ => {}
        }
        stmt
    }

    fn post_stmt(&mut self, stmt: Stmt) -> Rewritten {
        match &stmt.kind {
            StmtKind::Function { .. } => {
                self.in_function = false;
                self.ret_type = None;
            }
            StmtKind::While { .. } => {
                self.loop_depth -= 1;
            }
            StmtKind::Return { expr } => {
                if !self.in_function {
                    self.error(
                        DiagnosticKind::ControlFlow,
                        "\"return\" can be used only within a function.".to_string(),
                        stmt.loc,
                    );
                } else if let Some(ret) = self.ret_type {
                    if expr.ty.name() != ret.name() {
                        self.error(
                            DiagnosticKind::Type,
                            format!(
                                "Expression of type \"{}\" cannot be assigned to return type \"{}\".",
                                expr.ty.name(),
                                ret.name()
                            ),
                            expr.loc,
                        );
                    }
                }
            }
            StmtKind::Break => {
                if self.loop_depth == 0 {
                    self.error(
                        DiagnosticKind::ControlFlow,
                        "\"break\" can only be used within a loop.".to_string(),
                        stmt.loc,
                    );
                }
            }
            _ => {}
        }
        Rewritten::Single(stmt)
    }
}

impl Pass for CheckTypes {
    fn name(&self) -> &'static str {
        "check"
    }

    fn run(&mut self, program: Program) -> Result<Program, Vec<Diagnostic>> {
        self.source = program.source.clone();
        self.fname = program.fname.clone();
        let program = walk_program(self, program);
        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
