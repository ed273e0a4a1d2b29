use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser as ClapParser, Subcommand};

use imp_compiler::driver::{self, CompileError, Stage};
use imp_compiler::format::format_program;
use imp_compiler::lexer;

#[derive(ClapParser)]
#[command(name = "impc", about = "Compiler for the Imp language", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a source file to IR text
    Llvm {
        file: PathBuf,
        /// Write the IR here instead of printing it
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compile a source file to a native executable (requires clang)
    Compile {
        file: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print a reformatted rendering of the source
    Source {
        file: PathBuf,
        /// Run the full analysis pipeline before formatting
        #[arg(long)]
        optimize: bool,
    },
    /// Dump the AST after a named pipeline stage
    Ast {
        file: PathBuf,
        #[arg(long, default_value = "unscript")]
        stage: Stage,
    },
    /// Dump the token list
    Tokenize {
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            match err.downcast_ref::<CompileError>() {
                // Source diagnostics carry their own rendering; print them
                // bare, the way the compiler reports them.
                Some(e) if e.is_diagnostic() => print!("{}", e),
                _ => eprintln!("error: {:#}", err),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Llvm { file, output } => {
            let (source, fname) = load(&file)?;
            let ir = driver::compile_to_ir(&source, &fname)?;
            match output {
                Some(path) => driver::io::write_ir_file(&path, &ir)
                    .with_context(|| format!("failed to write {}", path.display()))?,
                None => print!("{}", ir),
            }
        }
        Command::Compile { file, output } => {
            let (source, fname) = load(&file)?;
            let ir = driver::compile_to_ir(&source, &fname)?;
            driver::io::build_executable(&ir, &output)?;
        }
        Command::Source { file, optimize } => {
            let (source, fname) = load(&file)?;
            let program = if optimize {
                driver::analyze(driver::to_ast(&source, &fname)?)?
            } else {
                driver::to_ast(&source, &fname)?
            };
            print!("{}", format_program(&program));
        }
        Command::Ast { file, stage } => {
            let (source, fname) = load(&file)?;
            let program = driver::ast_at_stage(&source, &fname, stage)?;
            println!("{:#?}", program.statements);
        }
        Command::Tokenize { file } => {
            let (source, fname) = load(&file)?;
            let tokens = lexer::tokenize(&source, &fname).map_err(CompileError::Syntax)?;
            for token in tokens {
                println!("{:?}", token);
            }
        }
    }
    Ok(())
}

fn load(path: &Path) -> anyhow::Result<(String, String)> {
    let source = driver::io::read_source(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let fname = path.display().to_string();
    Ok((source, fname))
}
