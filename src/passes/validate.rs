//! Error validation: surface every error expression the parser embedded.
//! Runs first so no later pass has to reason about malformed sub-trees.

use crate::ast::{ExprKind, Expression, Program};
use crate::diagnostics::Diagnostic;
use crate::walk::{walk_program, Transform};

use super::Pass;

pub struct Validate {
    errors: Vec<Diagnostic>,
}

impl Validate {
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }
}

impl Default for Validate {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for Validate {
    fn post_expr(&mut self, expr: Expression) -> Expression {
        if let ExprKind::Error(diag) = &expr.kind {
            self.errors.push(diag.clone());
        }
        expr
    }
}

impl Pass for Validate {
    fn name(&self) -> &'static str {
        "validate"
    }

    fn run(&mut self, program: Program) -> Result<Program, Vec<Diagnostic>> {
        let program = walk_program(self, program);
        if self.errors.is_empty() {
            Ok(program)
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}
