//! Source/IR file I/O and native toolchain invocation.

use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;

use super::CompileError;

/// Default location of the runtime print primitives, relative to the
/// working directory. Override with `IMP_RUNTIME`.
const RUNTIME_SRC: &str = "runtime/print.c";

pub fn read_source(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

pub fn write_ir_file(path: &Path, ir: &str) -> io::Result<()> {
    fs::write(path, ir)
}

/// Write the IR into a scratch directory and invoke clang on it together
/// with the runtime library. The scratch directory is removed when this
/// returns, on every path.
pub fn build_executable(ir: &str, output: &Path) -> Result<(), CompileError> {
    let runtime = std::env::var("IMP_RUNTIME").unwrap_or_else(|_| RUNTIME_SRC.to_string());
    let dir = tempfile::tempdir()?;
    let ir_path = dir.path().join("out.ll");
    fs::write(&ir_path, ir)?;

    let status = Command::new("clang")
        .arg(&ir_path)
        .arg(&runtime)
        .arg("-o")
        .arg(output)
        .status()
        .map_err(|e| CompileError::Toolchain(format!("failed to run clang: {}", e)))?;

    if !status.success() {
        return Err(CompileError::Toolchain(format!(
            "clang exited with status {}",
            status
        )));
    }
    Ok(())
}
