//! Scope resolution: classify every declaration and name reference as local
//! or global from lexical nesting. Function, branch and loop bodies each
//! open a scope; a declaration made inside one is invisible once the
//! construct is left. Names declared at the top level are global from any
//! depth. Undeclared uses are reported but still classified, so later
//! passes never see an unresolved name.

use std::collections::HashSet;

use crate::ast::{ExprKind, Expression, Program, Scope, Stmt, StmtKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::walk::{walk_program, Rewritten, Transform};

use super::Pass;

pub struct ResolveScopes {
    // scopes[0] is the global frame; one frame per open construct above it.
    scopes: Vec<HashSet<String>>,
    errors: Vec<Diagnostic>,
    source: String,
    fname: String,
}

impl ResolveScopes {
    pub fn new() -> Self {
        Self {
            scopes: vec![HashSet::new()],
            errors: Vec::new(),
            source: String::new(),
            fname: String::new(),
        }
    }

    fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn declare(&mut self, name: &str) {
        self.scopes
            .last_mut()
            .expect("global frame always present")
            .insert(name.to_string());
    }

    fn is_declared(&self, name: &str) -> bool {
        self.scopes.iter().any(|frame| frame.contains(name))
    }

    fn is_global(&self, name: &str) -> bool {
        self.scopes[0].contains(name)
    }

    fn classify(&self, name: &str) -> Scope {
        if self.is_global(name) {
            Scope::Global
        } else if self.depth() > 0 {
            Scope::Local
        } else {
            Scope::Global
        }
    }
}

impl Default for ResolveScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for ResolveScopes {
    fn pre_stmt(&mut self, stmt: Stmt) -> Stmt {
        match &stmt.kind {
            StmtKind::Function { params, .. } => {
                self.scopes.push(HashSet::new());
                for param in params {
                    self.declare(&param.name);
                }
            }
            StmtKind::Branch { .. } | StmtKind::While { .. } => {
                self.scopes.push(HashSet::new());
            }
            _ => {}
        }
        stmt
    }

    fn post_stmt(&mut self, stmt: Stmt) -> Rewritten {
        let Stmt { kind, loc } = stmt;
        let kind = match kind {
            StmtKind::Function { .. } | StmtKind::Branch { .. } | StmtKind::While { .. } => {
                self.scopes.pop();
                kind
            }
            StmtKind::VarDecl { name, declared, scope: _ } => {
                self.declare(&name);
                let scope = if self.depth() > 0 { Scope::Local } else { Scope::Global };
                StmtKind::VarDecl { name, declared, scope }
            }
            other => other,
        };
        Rewritten::Single(Stmt { kind, loc })
    }

    fn post_expr(&mut self, expr: Expression) -> Expression {
        let Expression { kind, ty, loc } = expr;
        let kind = match kind {
            ExprKind::Name { name, scope: _ } => {
                if !self.is_declared(&name) {
                    self.errors.push(Diagnostic::from_loc(
                        DiagnosticKind::Scope,
                        format!("Undeclared variable: `{}`.", name),
                        &self.fname,
                        &self.source,
                        loc,
                    ));
                }
                let scope = self.classify(&name);
                ExprKind::Name { name, scope }
            }
            other => other,
        };
        Expression { kind, ty, loc }
    }
}

impl Pass for ResolveScopes {
    fn name(&self) -> &'static str {
        "resolve"
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
