//! Semantic pass infrastructure.
//!
//! Passes rewrite the AST by value, one after another. Within a pass,
//! independent diagnostics are accumulated; a pass that ends with any
//! diagnostics fails, and the manager stops before the next pass runs, so a
//! later pass never sees an AST known to contain unresolved errors.

use crate::ast::Program;
use crate::diagnostics::Diagnostic;

pub mod add_types;
pub mod check_types;
pub mod deinit;
pub mod fold_constants;
pub mod resolve;
pub mod unscript;
pub mod validate;

pub use add_types::AddTypes;
pub use check_types::CheckTypes;
pub use deinit::Deinit;
pub use fold_constants::FoldConstants;
pub use resolve::ResolveScopes;
pub use unscript::Unscript;
pub use validate::Validate;

/// A pass that rewrites or checks a program.
pub trait Pass {
    /// Human-readable name for debugging/stage dumps.
    fn name(&self) -> &'static str;

    /// Execute the pass. Returns the rewritten program, or every diagnostic
    /// the pass accumulated.
    fn run(&mut self, program: Program) -> Result<Program, Vec<Diagnostic>>;
}

/// Runs passes in sequence, stopping at the first pass that accumulated
/// diagnostics.
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Add a pass to the pipeline. Passes execute in the order added.
    pub fn add_pass<P: Pass + 'static>(&mut self, pass: P) {
        self.passes.push(Box::new(pass));
    }

    pub fn run(&mut self, mut program: Program) -> Result<Program, Vec<Diagnostic>> {
        for pass in &mut self.passes {
            program = pass.run(program)?;
        }
        Ok(program)
    }

    /// The full analysis pipeline, in its fixed order.
    pub fn full_pipeline() -> Self {
        let mut manager = Self::new();
        manager.add_pass(Validate::new());
        manager.add_pass(AddTypes::new());
        manager.add_pass(CheckTypes::new());
        manager.add_pass(FoldConstants::new());
        manager.add_pass(Deinit::new());
        manager.add_pass(ResolveScopes::new());
        manager.add_pass(Unscript::new());
        manager
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}
