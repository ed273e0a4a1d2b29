//! Constant folding: arithmetic over literal operands computed at compile
//! time, bottom-up. Best-effort — a shape that cannot be folded is returned
//! unchanged and the pass never errors.

use crate::ast::{BinOp, ExprKind, Expression, Program, ScalarType};
use crate::diagnostics::Diagnostic;
use crate::walk::{walk_program, Transform};

use super::Pass;

pub struct FoldConstants;

impl FoldConstants {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FoldConstants {
    fn default() -> Self {
        Self::new()
    }
}

// A literal integer, or a unary-negated literal integer.
fn int_value(expr: &Expression) -> Option<i64> {
    match &expr.kind {
        ExprKind::Integer(v) => Some(*v),
        ExprKind::UnaryOp { expr: inner } => match inner.kind {
            ExprKind::Integer(v) => Some(-v),
            _ => None,
        },
        _ => None,
    }
}

fn float_value(expr: &Expression) -> Option<f64> {
    match &expr.kind {
        ExprKind::Float(v) => Some(*v),
        ExprKind::UnaryOp { expr: inner } => match inner.kind {
            ExprKind::Float(v) => Some(-v),
            _ => None,
        },
        _ => None,
    }
}

fn is_literal(expr: &Expression) -> bool {
    matches!(
        expr.kind,
        ExprKind::Integer(_) | ExprKind::Float(_) | ExprKind::Char(_) | ExprKind::Boolean(_)
    )
}

impl Transform for FoldConstants {
    fn post_expr(&mut self, expr: Expression) -> Expression {
        let Expression { kind, ty, loc } = expr;
        match kind {
            ExprKind::BinOp { op, lhs, rhs } => {
                if let (Some(a), Some(b)) = (int_value(&lhs), int_value(&rhs)) {
                    let folded = match op {
                        BinOp::Add => Some(a + b),
                        BinOp::Sub => Some(a - b),
                        BinOp::Mul => Some(a * b),
                        BinOp::Div => (b != 0).then(|| a / b),
                    };
                    if let Some(v) = folded {
                        return Expression::typed(ExprKind::Integer(v), ScalarType::Int, loc);
                    }
                }
                if let (Some(a), Some(b)) = (float_value(&lhs), float_value(&rhs)) {
                    let v = match op {
                        BinOp::Add => a + b,
                        BinOp::Sub => a - b,
                        BinOp::Mul => a * b,
                        BinOp::Div => a / b,
                    };
                    return Expression::typed(ExprKind::Float(v), ScalarType::Float, loc);
                }
                Expression { kind: ExprKind::BinOp { op, lhs, rhs }, ty, loc }
            }
            ExprKind::Parenthesis { expr: inner } => {
                if is_literal(&inner) {
                    let ty = inner.ty;
                    Expression { kind: inner.kind, ty, loc }
                } else {
                    Expression { kind: ExprKind::Parenthesis { expr: inner }, ty, loc }
                }
            }
            other => Expression { kind: other, ty, loc },
        }
    }
}

impl Pass for FoldConstants {
    fn name(&self) -> &'static str {
        "fold"
    }

    fn run(&mut self, program: Program) -> Result<Program, Vec<Diagnostic>> {
        Ok(walk_program(self, program))
    }
}
