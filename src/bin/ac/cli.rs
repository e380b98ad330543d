//! CLI argument parsing for `ac`, in the teacher's `clap`-derive style
//! (`src/bin/why/cli.rs`'s `Cli`/`LogLevel` pattern), adapted to the A
//! compiler's single positional file + mode shape (spec §6).

use std::path::PathBuf;

use clap::Parser;

use a_lang::mode::CompileMode;

/// `ac <input-file> [<mode>]`
#[derive(Parser, Debug)]
#[command(author, version, about = "Transpiles A source to C and drives the system C compiler.")]
pub struct Cli {
    /// Path to the `.a` source file to compile.
    pub input: PathBuf,

    /// Compilation mode: selects auto-close policy, logger verbosity,
    /// downstream `cc` flags, and whether the produced binary auto-runs.
    #[arg(value_enum, default_value_t = CompileMode::default())]
    pub mode: CompileMode,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}
