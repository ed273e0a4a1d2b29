use crate::ast::{BinOp, ExprKind, Expression, LogicOp, RelOp, ScalarType};

use super::{fmt_float, ir_type, scalar, slot, Codegen};

impl Codegen {
    /// Lower an expression, returning the IR value reference that holds its
    /// result. Literals are substituted directly; everything else appends
    /// instructions and returns a fresh synthetic name.
    pub(crate) fn res_expr(&mut self, expr: &Expression) -> String {
        match &expr.kind {
            ExprKind::Integer(v) => v.to_string(),
            ExprKind::Float(v) => fmt_float(*v),
            ExprKind::Boolean(b) => (if *b { "1" } else { "0" }).to_string(),
            ExprKind::Char(c) => (*c as u32).to_string(),

            ExprKind::Name { name, scope } => {
                let ty = ir_type(scalar(expr));
                let slot = slot(name, *scope);
                let id = self.gensym();
                self.emit(format!("%{} = load {}, {}* {}", id, ty, ty, slot));
                format!("%{}", id)
            }

            ExprKind::BinOp { op, lhs, rhs } => {
                let lhs_res = self.res_expr(lhs);
                let rhs_res = self.res_expr(rhs);
                let id = self.gensym();
                let opcode = bin_opcode(*op, scalar(expr));
                let ty = ir_type(scalar(expr));
                self.emit(format!("%{} = {} {} {}, {}", id, opcode, ty, lhs_res, rhs_res));
                format!("%{}", id)
            }

            ExprKind::RelOp { op, lhs, rhs } => {
                let lhs_res = self.res_expr(lhs);
                let rhs_res = self.res_expr(rhs);
                let id = self.gensym();
                // The tag is the operand flavor; it picks the comparison family.
                let flavor = scalar(expr);
                let opcode = rel_opcode(*op, flavor);
                let ty = ir_type(flavor);
                self.emit(format!("%{} = {} {} {}, {}", id, opcode, ty, lhs_res, rhs_res));
                format!("%{}", id)
            }

            ExprKind::LogicOp { op, lhs, rhs } => {
                let lhs_res = self.res_expr(lhs);
                let rhs_res = self.res_expr(rhs);
                let id = self.gensym();
                let opcode = match op {
                    LogicOp::And => "and",
                    LogicOp::Or => "or",
                };
                self.emit(format!("%{} = {} i1 {}, {}", id, opcode, lhs_res, rhs_res));
                format!("%{}", id)
            }

            ExprKind::Negation { expr: inner } => {
                let res = self.res_expr(inner);
                let id = self.gensym();
                self.emit(format!("%{} = xor i1 1, {}", id, res));
                format!("%{}", id)
            }

            ExprKind::UnaryOp { expr: inner } => {
                let res = self.res_expr(inner);
                let id = self.gensym();
                match scalar(expr) {
                    ScalarType::Float => {
                        self.emit(format!("%{} = fsub double 0.0, {}", id, res))
                    }
                    _ => self.emit(format!("%{} = sub i32 0, {}", id, res)),
                }
                format!("%{}", id)
            }

            ExprKind::Parenthesis { expr: inner } => self.res_expr(inner),

            ExprKind::Call { name, args } => {
                let mut arg_types = Vec::with_capacity(args.len());
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    let ty = ir_type(scalar(arg));
                    let res = self.res_expr(arg);
                    arg_types.push(ty.to_string());
                    arg_values.push(format!("{} {}", ty, res));
                }
                let ret = ir_type(scalar(expr));
                let id = self.gensym();
                self.emit(format!(
                    "%{} = call {} ({}) @{}({})",
                    id,
                    ret,
                    arg_types.join(", "),
                    name,
                    arg_values.join(", ")
                ));
                format!("%{}", id)
            }

            ExprKind::Error(_) => unreachable!("error expression reached code generation"),
        }
    }
}

fn bin_opcode(op: BinOp, ty: ScalarType) -> &'static str {
    match ty {
        ScalarType::Float => match op {
            BinOp::Add => "fadd",
            BinOp::Sub => "fsub",
            BinOp::Mul => "fmul",
            BinOp::Div => "fdiv",
        },
        _ => match op {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "sdiv",
        },
    }
}

fn rel_opcode(op: RelOp, flavor: ScalarType) -> &'static str {
    match flavor {
        ScalarType::Float => match op {
            RelOp::Lt => "fcmp olt",
            RelOp::Lte => "fcmp ole",
            RelOp::Eq => "fcmp oeq",
            RelOp::Gte => "fcmp oge",
            RelOp::Gt => "fcmp ogt",
            RelOp::NotEq => "fcmp one",
        },
        ScalarType::Bool => match op {
            RelOp::Lt => "icmp ult",
            RelOp::Lte => "icmp ule",
            RelOp::Eq => "icmp eq",
            RelOp::Gte => "icmp uge",
            RelOp::Gt => "icmp ugt",
            RelOp::NotEq => "icmp ne",
        },
        _ => match op {
            RelOp::Lt => "icmp slt",
            RelOp::Lte => "icmp sle",
            RelOp::Eq => "icmp eq",
            RelOp::Gte => "icmp sge",
            RelOp::Gt => "icmp sgt",
            RelOp::NotEq => "icmp ne",
        },
    }
}
