use crate::ast::{Param, ScalarType, SourceLoc, Stmt, StmtKind, Typing};
use crate::lexer::TokenKind;

use super::{ParseError, Parser};

impl Parser {
    pub fn parse_statements(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut statements = Vec::new();
        while let Some(stmt) = self.parse_statement()? {
            statements.push(stmt);
            if self.is_at_end() {
                break;
            }
        }
        Ok(statements)
    }

    /// Try each statement production in order, backtracking to the starting
    /// token on a recoverable failure. Fatal failures abort immediately.
    pub fn parse_statement(&mut self) -> Result<Option<Stmt>, ParseError> {
        let start = self.pos;
        let to_try: [fn(&mut Parser) -> Result<Stmt, ParseError>; 10] = [
            Parser::parse_assignment,
            Parser::parse_print,
            Parser::parse_vardecl,
            Parser::parse_varinit,
            Parser::parse_return,
            Parser::parse_branch,
            Parser::parse_func,
            Parser::parse_while,
            Parser::parse_break,
            Parser::parse_expr_stmt,
        ];
        for alt in to_try {
            match alt(self) {
                Ok(stmt) => return Ok(Some(stmt)),
                Err(err) if err.is_fatal() => return Err(err),
                Err(_) => self.pos = start,
            }
        }
        Ok(None)
    }

    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let target = self.parse_name()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expression()?;
        self.expect_fatal(TokenKind::Semi)?;
        let loc = SourceLoc::new(target.loc.line, target.loc.start, value.loc.end);
        Ok(Stmt::new(StmtKind::Assign { target, value }, loc))
    }

    fn parse_print(&mut self) -> Result<Stmt, ParseError> {
        let print = self.expect(TokenKind::Print)?;
        let expr = self.parse_expression()?;
        let end = self.expect_fatal(TokenKind::Semi)?;
        let loc = SourceLoc::new(print.line, print.column, end.column);
        Ok(Stmt::new(StmtKind::Print { expr }, loc))
    }

    fn parse_vardecl(&mut self) -> Result<Stmt, ParseError> {
        let var = self.expect(TokenKind::Var)?;
        let name = self.expect(TokenKind::Name)?;
        let (declared, _) = self.parse_type()?;
        let end = self.expect(TokenKind::Semi)?;
        let loc = SourceLoc::new(var.line, var.column, end.column);
        Ok(Stmt::new(
            StmtKind::VarDecl {
                name: name.text,
                declared,
                scope: crate::ast::Scope::Unresolved,
            },
            loc,
        ))
    }

    fn parse_varinit(&mut self) -> Result<Stmt, ParseError> {
        let var = self.expect(TokenKind::Var)?;
        let name = self.expect(TokenKind::Name)?;
        self.expect(TokenKind::Assign)?;
        let init = self.parse_expression()?;
        let end = self.expect_fatal(TokenKind::Semi)?;
        let loc = SourceLoc::new(var.line, var.column, end.column);
        Ok(Stmt::new(
            StmtKind::VarInit { name: name.text, init, ty: Typing::Untyped },
            loc,
        ))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let ret = self.expect(TokenKind::Return)?;
        let expr = self.parse_expression()?;
        let end = self.expect_fatal(TokenKind::Semi)?;
        let loc = SourceLoc::new(ret.line, ret.column, end.column);
        Ok(Stmt::new(StmtKind::Return { expr }, loc))
    }

    fn parse_branch(&mut self) -> Result<Stmt, ParseError> {
        let if_ = self.expect(TokenKind::If)?;
        let condition = self.parse_expression()?;
        self.expect_fatal(TokenKind::LBrace)?;
        let body = self.parse_statements()?;
        let end = self.expect_fatal(TokenKind::RBrace)?;
        let mut orelse = Vec::new();
        let mut last = end.column;
        if self.peek_kind(TokenKind::Else).is_some() {
            self.advance();
            self.expect(TokenKind::LBrace)?;
            orelse = self.parse_statements()?;
            last = self.expect_fatal(TokenKind::RBrace)?.column;
        }
        let loc = SourceLoc::new(if_.line, if_.column, last);
        Ok(Stmt::new(StmtKind::Branch { condition, body, orelse }, loc))
    }

    fn parse_func(&mut self) -> Result<Stmt, ParseError> {
        let func = self.expect(TokenKind::Func)?;
        let name = self.expect(TokenKind::Name)?;
        self.expect(TokenKind::LParen)?;
        let params = self.parse_func_params()?;
        self.expect_fatal(TokenKind::RParen)?;
        let (ret, _) = self.parse_type()?;
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_statements()?;
        let end = self.expect(TokenKind::RBrace)?;
        let loc = SourceLoc::new(func.line, func.column, end.column);
        Ok(Stmt::new(
            StmtKind::Function { name: name.text, params, ret, body },
            loc,
        ))
    }

    fn parse_func_params(&mut self) -> Result<Vec<Param>, ParseError> {
        let mut params = Vec::new();
        loop {
            if self.peek_kind(TokenKind::Name).is_none() {
                break;
            }
            let param = self.parse_func_param()?;
            if self.peek_kind(TokenKind::RParen).is_some() {
                params.push(param);
                break;
            }
            self.expect_fatal(TokenKind::Comma)?;
            params.push(param);
        }
        Ok(params)
    }

    fn parse_func_param(&mut self) -> Result<Param, ParseError> {
        let name = self.expect(TokenKind::Name)?;
        let (ty, ty_loc) = self.parse_type()?;
        Ok(Param {
            name: name.text,
            ty,
            loc: SourceLoc::new(name.line, name.column, ty_loc.end),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let while_ = self.expect(TokenKind::While)?;
        let condition = self.parse_expression()?;
        self.expect_fatal(TokenKind::LBrace)?;
        let body = self.parse_statements()?;
        let end = self.expect_fatal(TokenKind::RBrace)?;
        let loc = SourceLoc::new(while_.line, while_.column, end.column);
        Ok(Stmt::new(StmtKind::While { condition, body }, loc))
    }

    fn parse_break(&mut self) -> Result<Stmt, ParseError> {
        let token = self.expect(TokenKind::Break)?;
        let end = self.expect(TokenKind::Semi)?;
        let loc = SourceLoc::new(token.line, token.column, end.column);
        Ok(Stmt::new(StmtKind::Break, loc))
    }

    fn parse_expr_stmt(&mut self) -> Result<Stmt, ParseError> {
        let expr = self.parse_expression()?;
        let end = self.expect(TokenKind::Semi)?;
        let loc = SourceLoc::new(expr.loc.line, expr.loc.start, end.column);
        Ok(Stmt::new(StmtKind::ExprStmt { expr }, loc))
    }

    fn parse_type(&mut self) -> Result<(ScalarType, SourceLoc), ParseError> {
        let token = match self.peek() {
            Some(t) => t.clone(),
            None => return Err(ParseError::Eof),
        };
        let ty = match token.kind {
            TokenKind::IntType => ScalarType::Int,
            TokenKind::FloatType => ScalarType::Float,
            TokenKind::CharType => ScalarType::Char,
            TokenKind::BoolType => ScalarType::Bool,
            _ => return Err(ParseError::Unexpected(token)),
        };
        self.advance();
        let loc = SourceLoc::new(token.line, token.column, token.column + token.len());
        Ok((ty, loc))
    }
}
