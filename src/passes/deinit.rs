//! Deinitialization: split `var x = expr;` into a bare declaration followed
//! by an assignment, preserving the source span. Redeclaration of a name
//! already split in the same run is reported but still expanded, so a single
//! compile reports every duplicate.

use std::collections::HashSet;

use crate::ast::{ExprKind, Expression, Program, Scope, Stmt, StmtKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::walk::{walk_program, Rewritten, Transform};

use super::Pass;

pub struct Deinit {
    seen: HashSet<String>,
    errors: Vec<Diagnostic>,
    source: String,
    fname: String,
}

impl Deinit {
    pub fn new() -> Self {
        Self {
            seen: HashSet::new(),
            errors: Vec::new(),
            source: String::new(),
            fname: String::new(),
        }
    }
}

impl Default for Deinit {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Deinit {
    fn post_stmt(&mut self, stmt: Stmt) -> Rewritten {
        let Stmt { kind, loc } = stmt;
        let StmtKind::VarInit { name, init, ty } = kind else {
            return Rewritten::Single(Stmt { kind, loc });
        };
        let Some(declared) = ty.scalar() else {
            // An untyped initializer never gets here: the type assigner
            // fails its pass first.
            return Rewritten::Single(Stmt {
                kind: StmtKind::VarInit { name, init, ty },
                loc,
            });
        };

        if !self.seen.insert(name.clone()) {
            self.errors.push(Diagnostic::from_loc(
                DiagnosticKind::Scope,
                format!("Redeclaration of existing variable `{}`.", name),
                &self.fname,
                &self.source,
                loc,
            ));
        }

        let target = Expression::typed(
            ExprKind::Name { name: name.clone(), scope: Scope::Unresolved },
            declared,
            loc,
        );
        Rewritten::Many(vec![
            Stmt::new(
                StmtKind::VarDecl { name, declared, scope: Scope::Unresolved },
                loc,
            ),
            Stmt::new(StmtKind::Assign { target, value: init }, loc),
        ])
    }
}

impl Pass for Deinit {
    fn name(&self) -> &'static str {
        "deinit"
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
