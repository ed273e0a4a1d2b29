//! Grouping-balance validation, run over the raw token stream before the
//! parser proper. An imbalance anywhere makes backtracking recovery
//! meaningless, so all imbalances are reported together and parsing is
//! skipped entirely.

use crate::diagnostics::{Diagnostic, DiagnosticKind};
use crate::lexer::{Token, TokenKind};

pub fn validate_groupings(
    tokens: &[Token],
    source: &str,
    fname: &str,
) -> Result<(), Vec<Diagnostic>> {
    let mut curly: Vec<&Token> = Vec::new();
    let mut paren: Vec<&Token> = Vec::new();
    let mut errors: Vec<Diagnostic> = Vec::new();

    let err = |msg: &str, token: &Token| {
        Diagnostic::from_token(DiagnosticKind::Syntax, msg, fname, source, token)
    };

    for token in tokens {
        match token.kind {
            TokenKind::LParen => paren.push(token),
            TokenKind::RParen => {
                if paren.pop().is_none() {
                    errors.push(err("Found `)` with no opening `(`.", token));
                }
            }
            TokenKind::LBrace => curly.push(token),
            TokenKind::RBrace => {
                if curly.pop().is_none() {
                    errors.push(err("Found `}` with no opening `{`.", token));
                }
            }
            _ => {}
        }
    }

    for token in curly {
        errors.push(err("Found `{` with no closing `}`.", token));
    }
    for token in paren {
        errors.push(err("Found `(` with no closing `)`.", token));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
