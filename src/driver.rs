//! Driver glue (spec §4, §6, component K): reads the input file, feeds it
//! line by line to the statement dispatcher, assembles the final C source,
//! and invokes the downstream C toolchain. The only external blocking calls
//! in the whole compiler live here — everything upstream is pure, in-memory
//! text processing.

use std::fs;
use std::path::Path;
use std::process::Command;

use log::{error, info};

use crate::context::CompilationContext;
use crate::emitter::runtime::RUNTIME_BLOB;
use crate::handlers;
use crate::logger::EventKind;
use crate::mode::CompileMode;

/// Exit codes the binary surfaces to the shell (spec §6).
pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;

/// Runs one full compile: parse, emit `output.c`, invoke `cc`, and — in
/// debug modes — run the produced binary. Returns the process exit code;
/// I/O failures that prevent even starting the compile (file not openable)
/// surface as `Err` so `main` can report them distinctly.
pub fn run(input: &Path, mode: CompileMode) -> Result<i32, Box<dyn std::error::Error>> {
    let source = fs::read_to_string(input).map_err(|e| {
        format!("could not open input file '{}': {e}", input.display())
    })?;

    let mut ctx = CompilationContext::new(mode);
    let mut last_line = 0;
    for (idx, line) in source.lines().enumerate() {
        last_line = idx + 1;
        handlers::process_line(&mut ctx, last_line, line);
    }
    handlers::finalize(&mut ctx, last_line);

    if !ctx.diagnostics.is_empty() {
        eprint!("{}", ctx.diagnostics.report());
    }

    if ctx.diagnostics.has_errors() {
        return Ok(EXIT_FAILURE);
    }

    let c_source = ctx.output.finalize(RUNTIME_BLOB);
    fs::write("output.c", &c_source)?;

    let cc_args: Vec<&str> = mode
        .cc_flags()
        .iter()
        .copied()
        .chain(["output.c", "-o", "program"])
        .collect();
    ctx.log(EventKind::GccCmd, last_line, format!("cc {}", cc_args.join(" ")));
    info!("cc {}", cc_args.join(" "));

    let status = Command::new("cc").args(&cc_args).status()?;
    if !status.success() {
        error!("downstream C compilation failed with status {:?}", status.code());
        return Ok(EXIT_FAILURE);
    }

    println!("Compiled: ./program");

    if mode.auto_run() {
        ctx.log(EventKind::RunStart, last_line, "./program".to_owned());
        let run_status = Command::new("./program").status()?;
        ctx.log(
            EventKind::RunEnd,
            last_line,
            format!("exit code {:?}", run_status.code()),
        );
    }

    Ok(EXIT_OK)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_input_file_is_a_reported_error() {
        let result = run(Path::new("/nonexistent/path/to/nowhere.a"), CompileMode::Optimized);
        assert!(result.is_err());
    }

    #[test]
    fn error_only_source_returns_failure_before_touching_the_filesystem() {
        let path = std::env::temp_dir().join(format!("a-lang-driver-test-{}.a", std::process::id()));
        let mut f = fs::File::create(&path).unwrap();
        writeln!(f, "if x > 0:").unwrap();
        writeln!(f, "    print(\"hi\")").unwrap();

        // raw mode requires an explicit 'end'; none is given, so this is a
        // structural error and the driver must bail out before invoking `cc`.
        let result = run(&path, CompileMode::Raw);
        fs::remove_file(&path).ok();

        assert_eq!(result.unwrap(), EXIT_FAILURE);
    }
}
