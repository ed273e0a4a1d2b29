use crate::ast::{BinOp, ExprKind, Expression, LogicOp, RelOp, ScalarType, Scope, SourceLoc};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

/// Operator classification for the precedence reduction.
#[derive(Debug, Clone, Copy)]
enum OpKind {
    Bin(BinOp),
    Rel(RelOp),
    Logic(LogicOp),
}

fn operator_kind(kind: TokenKind) -> Option<OpKind> {
    let op = match kind {
        TokenKind::Plus => OpKind::Bin(BinOp::Add),
        TokenKind::Minus => OpKind::Bin(BinOp::Sub),
        TokenKind::Times => OpKind::Bin(BinOp::Mul),
        TokenKind::Divide => OpKind::Bin(BinOp::Div),
        TokenKind::Lt => OpKind::Rel(RelOp::Lt),
        TokenKind::Lte => OpKind::Rel(RelOp::Lte),
        TokenKind::Eq => OpKind::Rel(RelOp::Eq),
        TokenKind::Gte => OpKind::Rel(RelOp::Gte),
        TokenKind::Gt => OpKind::Rel(RelOp::Gt),
        TokenKind::NotEq => OpKind::Rel(RelOp::NotEq),
        TokenKind::And => OpKind::Logic(LogicOp::And),
        TokenKind::Or => OpKind::Logic(LogicOp::Or),
        _ => return None,
    };
    Some(op)
}

fn precedence(op: OpKind) -> u8 {
    match op {
        OpKind::Bin(BinOp::Mul) | OpKind::Bin(BinOp::Div) => 3,
        OpKind::Bin(BinOp::Add) | OpKind::Bin(BinOp::Sub) => 2,
        OpKind::Rel(_) => 1,
        OpKind::Logic(_) => 0,
    }
}

enum RpnItem {
    Operand(Expression),
    Operator(OpKind),
}

impl Parser {
    pub fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let start = self.pos;
        match self.parse_binop() {
            Ok(expr) => Ok(expr),
            Err(err) if err.is_fatal() => Err(err),
            Err(_) => {
                self.pos = start;
                self.parse_term()
            }
        }
    }

    /// Parse a flat operator/operand sequence left to right and reduce it
    /// with an operator stack. Equal precedence reduces immediately, which
    /// keeps every operator left-associative.
    fn parse_binop(&mut self) -> Result<Expression, ParseError> {
        let first = self.parse_term()?;

        // `=` where `==` was intended: consume the malformed comparison and
        // keep parsing the rest of the statement.
        if self.peek_kind(TokenKind::Assign).is_some() {
            return self.parse_misused_assign(first);
        }

        let mut output: Vec<RpnItem> = vec![RpnItem::Operand(first)];
        let mut operators: Vec<OpKind> = Vec::new();

        loop {
            let Some(op) = self.peek().and_then(|t| operator_kind(t.kind)) else {
                break;
            };
            self.advance();
            while let Some(&top) = operators.last() {
                if precedence(top) >= precedence(op) {
                    output.push(RpnItem::Operator(operators.pop().unwrap()));
                } else {
                    break;
                }
            }
            operators.push(op);

            let rhs = self.parse_term()?;
            output.push(RpnItem::Operand(rhs));

            if self.peek_kind(TokenKind::Assign).is_some() {
                let sofar = finish_reduction(output, operators);
                return self.parse_misused_assign(sofar);
            }
        }

        Ok(finish_reduction(output, operators))
    }

    fn parse_misused_assign(&mut self, lhs: Expression) -> Result<Expression, ParseError> {
        let assign = self.expect(TokenKind::Assign)?;
        // Consume the erroneous right-hand side so parsing can resume after it.
        let start = self.pos;
        if self.parse_expression().is_err() {
            self.pos = start;
        }
        let diag = self.diagnostic_at(&assign, "Unexpected `=`. Did you mean `==`?".to_string());
        let loc = SourceLoc::new(lhs.loc.line, lhs.loc.start, assign.column);
        Ok(Expression::untyped(ExprKind::Error(diag), loc))
    }

    pub(crate) fn parse_term(&mut self) -> Result<Expression, ParseError> {
        let start = self.pos;
        let to_try: [fn(&mut Parser) -> Result<Expression, ParseError>; 9] = [
            Parser::parse_parenthesis,
            Parser::parse_unary,
            Parser::parse_not,
            Parser::parse_call,
            Parser::parse_name,
            Parser::parse_float,
            Parser::parse_integer,
            Parser::parse_char,
            Parser::parse_bool,
        ];
        for alt in to_try {
            match alt(self) {
                Ok(expr) => return Ok(expr),
                Err(err) if err.is_fatal() => return Err(err),
                Err(_) => self.pos = start,
            }
        }
        match self.peek() {
            Some(t) => Err(ParseError::Unexpected(t.clone())),
            None => Err(ParseError::Eof),
        }
    }

    fn parse_parenthesis(&mut self) -> Result<Expression, ParseError> {
        let start = self.expect(TokenKind::LParen)?;
        let expr = self.parse_expression()?;
        let end = self.expect_fatal(TokenKind::RParen)?;
        Ok(Expression::untyped(
            ExprKind::Parenthesis { expr: Box::new(expr) },
            SourceLoc::new(start.line, start.column, end.column),
        ))
    }

    fn parse_unary(&mut self) -> Result<Expression, ParseError> {
        let minus = self.expect(TokenKind::Minus)?;
        let rhs = self.parse_term()?;
        let loc = SourceLoc::new(minus.line, minus.column, rhs.loc.end);
        Ok(Expression::untyped(ExprKind::UnaryOp { expr: Box::new(rhs) }, loc))
    }

    fn parse_not(&mut self) -> Result<Expression, ParseError> {
        let not = self.expect(TokenKind::Not)?;
        let rhs = self.parse_expression()?;
        let loc = SourceLoc::new(not.line, not.column, rhs.loc.end);
        Ok(Expression::typed(
            ExprKind::Negation { expr: Box::new(rhs) },
            ScalarType::Bool,
            loc,
        ))
    }

    fn parse_call(&mut self) -> Result<Expression, ParseError> {
        let func = self.expect(TokenKind::Name)?;
        self.expect(TokenKind::LParen)?;
        let args = if self.peek_kind(TokenKind::RParen).is_none() {
            self.parse_call_args()?
        } else {
            Vec::new()
        };
        let end = self.expect_fatal(TokenKind::RParen)?;
        Ok(Expression::untyped(
            ExprKind::Call { name: func.text, args },
            SourceLoc::new(func.line, func.column, end.column),
        ))
    }

    fn parse_call_args(&mut self) -> Result<Vec<Expression>, ParseError> {
        let mut args = Vec::new();
        loop {
            let arg = self.parse_expression()?;
            if self.peek_kind(TokenKind::RParen).is_some() {
                args.push(arg);
                break;
            }
            self.expect_fatal(TokenKind::Comma)?;
            args.push(arg);
        }
        Ok(args)
    }

    pub(crate) fn parse_name(&mut self) -> Result<Expression, ParseError> {
        let token = self.expect(TokenKind::Name)?;
        let loc = SourceLoc::new(token.line, token.column, token.column + token.len());
        Ok(Expression::untyped(
            ExprKind::Name { name: token.text, scope: Scope::Unresolved },
            loc,
        ))
    }

    fn parse_float(&mut self) -> Result<Expression, ParseError> {
        let base = self.expect(TokenKind::Integer)?;
        self.expect(TokenKind::Dot)?;
        let decimals = self.expect(TokenKind::Integer)?;
        let value: f64 = format!("{}.{}", base.text, decimals.text)
            .parse()
            .expect("digit runs form a valid float literal");
        Ok(Expression::typed(
            ExprKind::Float(value),
            ScalarType::Float,
            SourceLoc::new(base.line, base.column, decimals.column + decimals.len()),
        ))
    }

    fn parse_integer(&mut self) -> Result<Expression, ParseError> {
        let token = self.expect(TokenKind::Integer)?;
        let value: i64 = match token.text.parse() {
            Ok(v) => v,
            Err(_) => {
                return Err(self.fatal_at(&token, "Integer literal out of range.".to_string()))
            }
        };
        Ok(Expression::typed(
            ExprKind::Integer(value),
            ScalarType::Int,
            SourceLoc::new(token.line, token.column, token.column + token.len()),
        ))
    }

    fn parse_char(&mut self) -> Result<Expression, ParseError> {
        let start = self.expect(TokenKind::Quote)?;
        let escaped = if self.peek_kind(TokenKind::Backslash).is_some() {
            self.advance();
            true
        } else {
            false
        };
        let inner = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::Name | TokenKind::Integer) => {
                self.advance().unwrap()
            }
            Some(t) => return Err(ParseError::Unexpected(t.clone())),
            None => return Err(ParseError::Eof),
        };
        let end = self.expect(TokenKind::Quote)?;

        if inner.len() > 1 {
            let diag = self.diagnostic_at(
                &inner,
                format!("Found {} characters, only 1 is expected.", inner.len()),
            );
            let loc = SourceLoc::new(inner.line, inner.column, inner.column + inner.len());
            return Ok(Expression::untyped(ExprKind::Error(diag), loc));
        }

        let c = inner.text.chars().next().expect("single-character token");
        let value = if escaped { unescape(c) } else { c };
        Ok(Expression::typed(
            ExprKind::Char(value),
            ScalarType::Char,
            SourceLoc::new(start.line, start.column, end.column),
        ))
    }

    fn parse_bool(&mut self) -> Result<Expression, ParseError> {
        let token = match self.peek() {
            Some(t) if matches!(t.kind, TokenKind::True | TokenKind::False) => {
                self.advance().unwrap()
            }
            Some(t) => return Err(ParseError::Unexpected(t.clone())),
            None => return Err(ParseError::Eof),
        };
        let value = token.kind == TokenKind::True;
        Ok(Expression::typed(
            ExprKind::Boolean(value),
            ScalarType::Bool,
            SourceLoc::new(token.line, token.column, token.column + token.len()),
        ))
    }
}

fn unescape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// Drain the remaining operator stack and fold the output queue into a tree.
fn finish_reduction(mut output: Vec<RpnItem>, mut operators: Vec<OpKind>) -> Expression {
    while let Some(op) = operators.pop() {
        output.push(RpnItem::Operator(op));
    }

    let mut stack: Vec<Expression> = Vec::new();
    for item in output {
        match item {
            RpnItem::Operand(expr) => stack.push(expr),
            RpnItem::Operator(op) => {
                let rhs = stack.pop().expect("operand for operator");
                let lhs = stack.pop().expect("operand for operator");
                let loc = SourceLoc::between(lhs.loc, rhs.loc);
                let expr = match op {
                    OpKind::Bin(op) => Expression::untyped(
                        ExprKind::BinOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                        loc,
                    ),
                    OpKind::Rel(op) => Expression::untyped(
                        ExprKind::RelOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                        loc,
                    ),
                    OpKind::Logic(op) => Expression::typed(
                        ExprKind::LogicOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                        ScalarType::Bool,
                        loc,
                    ),
                };
                stack.push(expr);
            }
        }
    }
    stack.pop().expect("reduction leaves one expression")
}
