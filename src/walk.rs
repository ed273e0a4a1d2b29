//! Generic AST rewriting engine.
//!
//! Every semantic pass is a `Transform`: a set of hooks fired while the tree
//! is rebuilt bottom-up by value. `pre_*` hooks fire before a node's
//! children are rewritten, `post_*` hooks after; a statement post hook may
//! return several statements, which are spliced into the enclosing sequence
//! in place of the original. Passes never hand-walk the tree themselves.

use crate::ast::{ExprKind, Expression, Program, Stmt, StmtKind};

/// Result of rewriting one statement.
pub enum Rewritten {
    Single(Stmt),
    Many(Vec<Stmt>),
}

pub trait Transform {
    fn pre_stmt(&mut self, stmt: Stmt) -> Stmt {
        stmt
    }

    fn post_stmt(&mut self, stmt: Stmt) -> Rewritten {
        Rewritten::Single(stmt)
    }

    fn pre_expr(&mut self, expr: Expression) -> Expression {
        expr
    }

    fn post_expr(&mut self, expr: Expression) -> Expression {
        expr
    }

    fn post_program(&mut self, program: Program) -> Program {
        program
    }
}

pub fn walk_program<T: Transform>(t: &mut T, program: Program) -> Program {
    let statements = walk_stmts(t, program.statements);
    t.post_program(Program { statements, ..program })
}

pub fn walk_stmts<T: Transform>(t: &mut T, stmts: Vec<Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        match walk_stmt(t, stmt) {
            Rewritten::Single(s) => out.push(s),
            Rewritten::Many(list) => out.extend(list),
        }
    }
    out
}

fn walk_stmt<T: Transform>(t: &mut T, stmt: Stmt) -> Rewritten {
    let stmt = t.pre_stmt(stmt);
    let Stmt { kind, loc } = stmt;
    let kind = match kind {
        StmtKind::VarInit { name, init, ty } => StmtKind::VarInit {
            name,
            init: walk_expr(t, init),
            ty,
        },
        StmtKind::Assign { target, value } => StmtKind::Assign {
            target: walk_expr(t, target),
            value: walk_expr(t, value),
        },
        StmtKind::Print { expr } => StmtKind::Print { expr: walk_expr(t, expr) },
        StmtKind::Branch { condition, body, orelse } => StmtKind::Branch {
            condition: walk_expr(t, condition),
            body: walk_stmts(t, body),
            orelse: walk_stmts(t, orelse),
        },
        StmtKind::While { condition, body } => StmtKind::While {
            condition: walk_expr(t, condition),
            body: walk_stmts(t, body),
        },
        StmtKind::Function { name, params, ret, body } => StmtKind::Function {
            name,
            params,
            ret,
            body: walk_stmts(t, body),
        },
        StmtKind::Return { expr } => StmtKind::Return { expr: walk_expr(t, expr) },
        StmtKind::ExprStmt { expr } => StmtKind::ExprStmt { expr: walk_expr(t, expr) },
        leaf @ (StmtKind::VarDecl { .. } | StmtKind::Break) => leaf,
    };
    t.post_stmt(Stmt { kind, loc })
}

pub fn walk_expr<T: Transform>(t: &mut T, expr: Expression) -> Expression {
    let expr = t.pre_expr(expr);
    let Expression { kind, ty, loc } = expr;
    let kind = match kind {
        ExprKind::BinOp { op, lhs, rhs } => ExprKind::BinOp {
            op,
            lhs: Box::new(walk_expr(t, *lhs)),
            rhs: Box::new(walk_expr(t, *rhs)),
        },
        ExprKind::RelOp { op, lhs, rhs } => ExprKind::RelOp {
            op,
            lhs: Box::new(walk_expr(t, *lhs)),
            rhs: Box::new(walk_expr(t, *rhs)),
        },
        ExprKind::LogicOp { op, lhs, rhs } => ExprKind::LogicOp {
            op,
            lhs: Box::new(walk_expr(t, *lhs)),
            rhs: Box::new(walk_expr(t, *rhs)),
        },
        ExprKind::Negation { expr } => ExprKind::Negation {
            expr: Box::new(walk_expr(t, *expr)),
        },
        ExprKind::UnaryOp { expr } => ExprKind::UnaryOp {
            expr: Box::new(walk_expr(t, *expr)),
        },
        ExprKind::Parenthesis { expr } => ExprKind::Parenthesis {
            expr: Box::new(walk_expr(t, *expr)),
        },
        ExprKind::Call { name, args } => ExprKind::Call {
            name,
            args: args.into_iter().map(|a| walk_expr(t, a)).collect(),
        },
        leaf @ (ExprKind::Name { .. }
        | ExprKind::Integer(_)
        | ExprKind::Float(_)
        | ExprKind::Char(_)
        | ExprKind::Boolean(_)
        | ExprKind::Error(_)) => leaf,
    };
    t.post_expr(Expression { kind, ty, loc })
}
