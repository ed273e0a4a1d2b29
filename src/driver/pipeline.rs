//! Compilation pipeline orchestration.
//!
//! Coordinates the stages from source text through token validation,
//! parsing, the semantic pass sequence, and code generation.

use std::str::FromStr;

use crate::ast::Program;
use crate::codegen::generate_ir;
use crate::lexer::tokenize;
use crate::parser::{braces, ParseError, Parser};
use crate::passes::{
    AddTypes, CheckTypes, Deinit, FoldConstants, PassManager, ResolveScopes, Unscript, Validate,
};

use super::CompileError;

/// A named point in the pipeline at which the AST can be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Parse,
    Validate,
    Types,
    Check,
    Fold,
    Deinit,
    Resolve,
    Unscript,
}

impl Stage {
    pub fn all() -> [Stage; 8] {
        [
            Stage::Parse,
            Stage::Validate,
            Stage::Types,
            Stage::Check,
            Stage::Fold,
            Stage::Deinit,
            Stage::Resolve,
            Stage::Unscript,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Validate => "validate",
            Stage::Types => "types",
            Stage::Check => "check",
            Stage::Fold => "fold",
            Stage::Deinit => "deinit",
            Stage::Resolve => "resolve",
            Stage::Unscript => "unscript",
        }
    }
}

impl FromStr for Stage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::all()
            .into_iter()
            .find(|stage| stage.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = Stage::all().iter().map(|s| s.name()).collect();
                format!("unknown stage `{}` (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Tokenize, balance-check, and parse a source file into an AST.
pub fn to_ast(source: &str, fname: &str) -> Result<Program, CompileError> {
    let tokens = tokenize(source, fname).map_err(CompileError::Syntax)?;
    braces::validate_groupings(&tokens, source, fname).map_err(CompileError::Rejected)?;
    match Parser::new(tokens, source, fname).parse() {
        Ok(program) => Ok(program),
        Err(ParseError::Fatal(diag)) => Err(CompileError::Syntax(diag)),
        Err(err) => unreachable!("parser returned a recoverable error at top level: {:?}", err),
    }
}

/// Run the full pass pipeline over a parsed program.
pub fn analyze(program: Program) -> Result<Program, CompileError> {
    PassManager::full_pipeline()
        .run(program)
        .map_err(CompileError::Rejected)
}

/// Parse and run the pipeline up to (and including) the named stage.
pub fn ast_at_stage(source: &str, fname: &str, stage: Stage) -> Result<Program, CompileError> {
    let program = to_ast(source, fname)?;
    let mut manager = PassManager::new();
    if stage >= Stage::Validate {
        manager.add_pass(Validate::new());
    }
    if stage >= Stage::Types {
        manager.add_pass(AddTypes::new());
    }
    if stage >= Stage::Check {
        manager.add_pass(CheckTypes::new());
    }
    if stage >= Stage::Fold {
        manager.add_pass(FoldConstants::new());
    }
    if stage >= Stage::Deinit {
        manager.add_pass(Deinit::new());
    }
    if stage >= Stage::Resolve {
        manager.add_pass(ResolveScopes::new());
    }
    if stage >= Stage::Unscript {
        manager.add_pass(Unscript::new());
    }
    manager.run(program).map_err(CompileError::Rejected)
}

/// Compile source text all the way to IR text.
pub fn compile_to_ir(source: &str, fname: &str) -> Result<String, CompileError> {
    let program = to_ast(source, fname)?;
    let program = analyze(program)?;
    Ok(generate_ir(&program))
}
