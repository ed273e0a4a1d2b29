//! Compilation orchestration and I/O.

pub mod io;
pub mod pipeline;

use thiserror::Error;

use crate::diagnostics::{render_all, Diagnostic};

pub use pipeline::{analyze, ast_at_stage, compile_to_ir, to_ast, Stage};

#[derive(Debug, Error)]
pub enum CompileError {
    /// An unrecoverable syntax problem: bad character, grouping imbalance
    /// rendered as one or more diagnostics, or a fatal parse failure.
    #[error("{0}")]
    Syntax(Diagnostic),

    /// A pass ended with accumulated diagnostics; all of them are reported
    /// and no IR is produced.
    #[error("{}", render_all(.0))]
    Rejected(Vec<Diagnostic>),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("native toolchain failed: {0}")]
    Toolchain(String),
}

impl CompileError {
    /// True when the error is a set of source diagnostics, as opposed to an
    /// environment problem.
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, CompileError::Syntax(_) | CompileError::Rejected(_))
    }
}
