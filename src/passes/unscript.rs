//! Unscripting: lift every top-level executable statement into a synthesized
//! `main` function returning status zero. Afterwards the top level holds
//! only global declarations and function definitions, in their original
//! order, with `main` appended last.

use crate::ast::{
    ExprKind, Expression, Param, Program, ScalarType, Scope, SourceLoc, Stmt, StmtKind,
};
use crate::diagnostics::Diagnostic;
use crate::walk::{walk_program, Transform};

use super::Pass;

pub const ENTRY_NAME: &str = "main";

pub struct Unscript;

impl Unscript {
    pub fn new() -> Self {
        Self
    }
}

impl Default for Unscript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Unscript {
    fn post_program(&mut self, program: Program) -> Program {
        let mut top = Vec::new();
        let mut body = Vec::new();
        for stmt in program.statements {
            match &stmt.kind {
                StmtKind::VarDecl { scope: Scope::Global, .. } | StmtKind::Function { .. } => {
                    top.push(stmt)
                }
                _ => body.push(stmt),
            }
        }

        let zero = Expression::typed(
            ExprKind::Integer(0),
            ScalarType::Int,
            SourceLoc::synthetic(),
        );
        body.push(Stmt::new(
            StmtKind::Return { expr: zero },
            SourceLoc::synthetic(),
        ));

        top.push(Stmt::new(
            StmtKind::Function {
                name: ENTRY_NAME.to_string(),
                params: vec![Param {
                    name: "_".to_string(),
                    ty: ScalarType::Int,
                    loc: SourceLoc::synthetic(),
                }],
                ret: ScalarType::Int,
                body,
            },
            SourceLoc::synthetic(),
        ));

        Program { statements: top, ..program }
    }
}

impl Pass for Unscript {
    fn name(&self) -> &'static str {
        "unscript"
    }

    fn run(&mut self, program: Program) -> Result<Program, Vec<Diagnostic>> {
        Ok(walk_program(self, program))
    }
}
