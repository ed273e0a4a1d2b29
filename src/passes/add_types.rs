//! Type assignment: give every expression its scalar-type tag.
//!
//! Operates bottom-up over an error-free AST. Symbol tables exist only for
//! the duration of this pass; afterwards every use site carries its own tag
//! and downstream passes dispatch on that instead. Mismatches become error
//! expressions in place, so one run surfaces as many problems as possible.

use std::collections::HashMap;

use crate::ast::{ExprKind, Expression, Program, ScalarType, SourceLoc, Stmt, StmtKind};
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::walk::{walk_program, Rewritten, Transform};

use super::Pass;

#[derive(Clone)]
struct Signature {
    params: Vec<(String, ScalarType)>,
    ret: ScalarType,
}

pub struct AddTypes {
    globals: HashMap<String, ScalarType>,
    locals: HashMap<String, ScalarType>,
    funcs: HashMap<String, Signature>,
    in_function: bool,
    errors: Vec<Diagnostic>,
    source: String,
    fname: String,
}

impl AddTypes {
    pub fn new() -> Self {
        Self {
            globals: HashMap::new(),
            locals: HashMap::new(),
            funcs: HashMap::new(),
            in_function: false,
            errors: Vec::new(),
            source: String::new(),
            fname: String::new(),
        }
    }

    fn error_expr(&mut self, kind: DiagnosticKind, message: String, loc: SourceLoc) -> Expression {
        let diag = Diagnostic::from_loc(kind, message, &self.fname, &self.source, loc);
        self.errors.push(diag.clone());
        Expression::untyped(ExprKind::Error(diag), loc)
    }

    fn lookup(&self, name: &str) -> Option<ScalarType> {
        if self.in_function {
            self.locals.get(name).or_else(|| self.globals.get(name)).copied()
        } else {
            self.globals.get(name).copied()
        }
    }

    fn declare(&mut self, name: &str, ty: ScalarType) {
        if self.in_function {
            self.locals.insert(name.to_string(), ty);
        } else {
            self.globals.insert(name.to_string(), ty);
        }
    }
}

impl Default for AddTypes {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for AddTypes {
    fn pre_stmt(&mut self, stmt: Stmt) -> Stmt {
        if let StmtKind::Function { name, params, ret, .. } = &stmt.kind {
            self.funcs.insert(
                name.clone(),
                Signature {
                    params: params.iter().map(|p| (p.name.clone(), p.ty)).collect(),
                    ret: *ret,
                },
            );
            self.locals = params.iter().map(|p| (p.name.clone(), p.ty)).collect();
            self.in_function = true;
        }
        stmt
    }

    fn post_stmt(&mut self, stmt: Stmt) -> Rewritten {
        let Stmt { kind, loc } = stmt;
        let kind = match kind {
            StmtKind::VarInit { name, init, ty: _ } => {
                let ty = init.ty;
                let init = if self.locals.contains_key(&name) || self.globals.contains_key(&name) {
                    self.error_expr(
                        DiagnosticKind::Scope,
                        format!("Redeclaration of existing variable `{}`.", name),
                        loc,
                    )
                } else {
                    init
                };
                if let Some(t) = ty.scalar() {
                    self.declare(&name, t);
                }
                StmtKind::VarInit { name, init, ty }
            }
            StmtKind::VarDecl { name, declared, scope } => {
                self.declare(&name, declared);
                StmtKind::VarDecl { name, declared, scope }
            }
            StmtKind::Function { name, params, ret, body } => {
                self.in_function = false;
                self.locals.clear();
                StmtKind::Function { name, params, ret, body }
            }
            other => other,
        };
        Rewritten::Single(Stmt { kind, loc })
    }

    fn post_expr(&mut self, expr: Expression) -> Expression {
        let Expression { kind, ty, loc } = expr;
        match kind {
            ExprKind::Name { name, scope } => match self.lookup(&name) {
                Some(t) => Expression::typed(ExprKind::Name { name, scope }, t, loc),
                None => self.error_expr(
                    DiagnosticKind::Type,
                    format!("\"{}\" is not defined.", name),
                    loc,
                ),
            },
            ExprKind::BinOp { op, lhs, rhs } => match (lhs.ty.scalar(), rhs.ty.scalar()) {
                (Some(ScalarType::Int), Some(ScalarType::Int)) => Expression::typed(
                    ExprKind::BinOp { op, lhs, rhs },
                    ScalarType::Int,
                    loc,
                ),
                (Some(ScalarType::Float), Some(ScalarType::Float)) => Expression::typed(
                    ExprKind::BinOp { op, lhs, rhs },
                    ScalarType::Float,
                    loc,
                ),
                _ => {
                    let msg = format!(
                        "Operator {} not supported for types \"{}\" and \"{}\".",
                        op.symbol(),
                        lhs.ty.name(),
                        rhs.ty.name()
                    );
                    self.error_expr(DiagnosticKind::Type, msg, loc)
                }
            },
            ExprKind::RelOp { op, lhs, rhs } => {
                // The tag records the operand flavor; opcode selection needs
                // it, the result is boolean either way.
                let flavor = match (lhs.ty.scalar(), rhs.ty.scalar()) {
                    (Some(ScalarType::Int), Some(ScalarType::Int)) => Some(ScalarType::Int),
                    (Some(ScalarType::Float), Some(ScalarType::Float)) => Some(ScalarType::Float),
                    (Some(ScalarType::Bool), Some(ScalarType::Bool)) => Some(ScalarType::Bool),
                    _ => None,
                };
                match flavor {
                    Some(t) => Expression::typed(ExprKind::RelOp { op, lhs, rhs }, t, loc),
                    None => {
                        let msg = format!(
                            "Operator {} not supported for types \"{}\" and \"{}\".",
                            op.symbol(),
                            lhs.ty.name(),
                            rhs.ty.name()
                        );
                        self.error_expr(DiagnosticKind::Type, msg, loc)
                    }
                }
            }
            ExprKind::UnaryOp { expr: inner } => match inner.ty.scalar() {
                Some(t @ (ScalarType::Int | ScalarType::Float)) => {
                    Expression::typed(ExprKind::UnaryOp { expr: inner }, t, loc)
                }
                _ => {
                    let msg = format!(
                        "Operator - not supported for type \"{}\".",
                        inner.ty.name()
                    );
                    self.error_expr(DiagnosticKind::Type, msg, loc)
                }
            },
            ExprKind::Parenthesis { expr: inner } => {
                // Inherits the inner type. An untypeable inner expression is
                // already an error node; no second diagnostic on the same span.
                let ty = inner.ty;
                Expression { kind: ExprKind::Parenthesis { expr: inner }, ty, loc }
            }
            ExprKind::Call { name, args } => {
                let Some(sig) = self.funcs.get(&name).cloned() else {
                    return self.error_expr(
                        DiagnosticKind::Type,
                        format!("\"{}\" is not defined.", name),
                        loc,
                    );
                };
                if sig.params.len() != args.len() {
                    let err_loc = if args.is_empty() {
                        loc
                    } else {
                        SourceLoc::between(args[0].loc, args[args.len() - 1].loc)
                    };
                    return self.error_expr(
                        DiagnosticKind::Type,
                        format!(
                            "\"{}\" expects {} arguments, but received {} arguments.",
                            name,
                            sig.params.len(),
                            args.len()
                        ),
                        err_loc,
                    );
                }
                let mut new_args = Vec::with_capacity(args.len());
                for (arg, (param_name, param_ty)) in args.into_iter().zip(sig.params.iter()) {
                    match arg.ty.scalar() {
                        Some(t) if t != *param_ty => {
                            let msg = format!(
                                "Argument of type \"{}\" cannot be assigned to parameter \"{}\" of type \"{}\" in function \"{}\".",
                                t.name(),
                                param_name,
                                param_ty.name(),
                                name
                            );
                            let arg_loc = arg.loc;
                            new_args.push(self.error_expr(DiagnosticKind::Type, msg, arg_loc));
                        }
                        _ => new_args.push(arg),
                    }
                }
                Expression::typed(ExprKind::Call { name, args: new_args }, sig.ret, loc)
            }
            other => Expression { kind: other, ty, loc },
        }
    }
}

impl Pass for AddTypes {
    fn name(&self) -> &'static str {
        "types"
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
