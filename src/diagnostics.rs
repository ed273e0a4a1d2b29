//! Compile diagnostics with source-line context.
//!
//! A `Diagnostic` is rendered once, at construction, against the source text
//! it refers to; after that it is plain data that can travel inside AST
//! error nodes or pass accumulators without dragging the source along.

use std::fmt;

use crate::ast::SourceLoc;
use crate::lexer::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    Syntax,
    Type,
    Scope,
    ControlFlow,
}

impl DiagnosticKind {
    pub fn label(&self) -> &'static str {
        match self {
            DiagnosticKind::Syntax => "SyntaxError",
            DiagnosticKind::Type => "TypeError",
            DiagnosticKind::Scope => "ScopeError",
            DiagnosticKind::ControlFlow => "ControlFlowError",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: usize,
    pub start: usize,
    pub end: usize,
    rendered: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        message: impl Into<String>,
        fname: &str,
        source: &str,
        line: usize,
        start: usize,
        end: usize,
    ) -> Self {
        let message = message.into();
        let rendered = render(kind, &message, fname, source, line, start, end);
        Diagnostic { kind, message, line, start, end, rendered }
    }

    pub fn from_token(
        kind: DiagnosticKind,
        message: impl Into<String>,
        fname: &str,
        source: &str,
        token: &Token,
    ) -> Self {
        Self::new(
            kind,
            message,
            fname,
            source,
            token.line,
            token.column,
            token.column + token.len(),
        )
    }

    pub fn from_loc(
        kind: DiagnosticKind,
        message: impl Into<String>,
        fname: &str,
        source: &str,
        loc: SourceLoc,
    ) -> Self {
        Self::new(kind, message, fname, source, loc.line, loc.start, loc.end)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.rendered)
    }
}

// Mirrors the renderer the runtime errors use: the offending source line
// prefixed by two spaces, a caret line under the offending columns, then
// the kind label and message.
fn render(
    kind: DiagnosticKind,
    message: &str,
    fname: &str,
    source: &str,
    line: usize,
    start: usize,
    end: usize,
) -> String {
    let mut out = String::new();
    let src_line = line
        .checked_sub(1)
        .and_then(|idx| source.lines().nth(idx));
    if let Some(src_line) = src_line {
        out.push_str(&format!("File \"{}\" line {}\n", fname, line));
        out.push_str("  ");
        out.push_str(src_line);
        out.push('\n');
        out.push_str("  ");
        out.push_str(&" ".repeat(start.saturating_sub(1)));
        out.push_str(&"^".repeat(end.saturating_sub(start).max(1)));
        out.push('\n');
    }
    out.push_str(&format!("{}: {}\n", kind.label(), message));
    out
}

/// Join a batch of accumulated diagnostics for display.
pub fn render_all(diags: &[Diagnostic]) -> String {
    diags.iter().map(|d| d.to_string()).collect::<Vec<_>>().join("")
}
