mod expressions;
mod statements;

pub mod braces;

use crate::ast::Program;
use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    Eof,
    Unexpected(Token),
    Expected { kind: TokenKind, found: Token },
    /// A confirmed construct is missing a mandatory delimiter; recovery
    /// would misparse the remainder of the file, so no backtracking.
    Fatal(Diagnostic),
}

impl ParseError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::Fatal(_))
    }
}

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    source: String,
    fname: String,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, source: impl Into<String>, fname: impl Into<String>) -> Self {
        Parser {
            tokens,
            pos: 0,
            source: source.into(),
            fname: fname.into(),
        }
    }

    /// Parse a whole token stream into a program. Statement parsing stops
    /// when no production matches; tokens left over at that point are a
    /// fatal syntax error rather than silently dropped.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        let statements = self.parse_statements()?;
        if let Some(token) = self.peek() {
            let token = token.clone();
            return Err(self.fatal_at(&token, format!("Unexpected token `{}`.", token.text)));
        }
        Ok(Program {
            statements,
            source: self.source.clone(),
            fname: self.fname.clone(),
            loc: crate::ast::SourceLoc::new(0, 0, self.source.len()),
        })
    }

    // Token utility methods

    pub(crate) fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    pub(crate) fn peek_nth(&self, n: usize) -> Option<&Token> {
        self.tokens.get(self.pos + n)
    }

    /// The current token, if it has the given kind.
    pub(crate) fn peek_kind(&self, kind: TokenKind) -> Option<&Token> {
        self.peek().filter(|t| t.kind == kind)
    }

    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// Consume a token of the given kind, or fail recoverably so the caller
    /// can backtrack to another production.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(t) if t.kind == kind => Ok(self.advance().unwrap()),
            Some(t) => Err(ParseError::Expected { kind, found: t.clone() }),
            None => Err(ParseError::Eof),
        }
    }

    /// Consume a token of the given kind, or abort the parse with a rendered
    /// diagnostic. Used after a statement header has been confirmed.
    pub(crate) fn expect_fatal(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(t) if t.kind == kind => Ok(self.advance().unwrap()),
            Some(t) => {
                let t = t.clone();
                Err(self.fatal_at(&t, format!("Expected {}. Got `{}`.", kind.describe(), t.text)))
            }
            None => {
                let line = self.tokens.last().map(|t| t.line).unwrap_or(1);
                let col = self.tokens.last().map(|t| t.column + t.len()).unwrap_or(1);
                Err(ParseError::Fatal(Diagnostic::new(
                    DiagnosticKind::Syntax,
                    format!("Expected {}. Got end of input.", kind.describe()),
                    &self.fname,
                    &self.source,
                    line,
                    col,
                    col + 1,
                )))
            }
        }
    }

    pub(crate) fn fatal_at(&self, token: &Token, message: String) -> ParseError {
        ParseError::Fatal(self.diagnostic_at(token, message))
    }

    pub(crate) fn diagnostic_at(&self, token: &Token, message: String) -> Diagnostic {
        Diagnostic::from_token(DiagnosticKind::Syntax, message, &self.fname, &self.source, token)
    }
}
