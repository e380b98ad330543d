//! `ac` — the A-to-C compiler binary. Parses CLI arguments, installs the
//! logger at the verbosity the selected mode implies, runs the translator,
//! and maps its outcome onto the exit codes from spec §6.

mod cli;

use std::process::ExitCode;

use cli::Cli;
use log::Level;

fn main() -> ExitCode {
    let cli = Cli::init();

    match cli.mode.log_mode() {
        a_lang::logger::LogMode::None => a_lang::logger::install(Level::Error),
        a_lang::logger::LogMode::Human | a_lang::logger::LogMode::Machine => {
            a_lang::logger::install(Level::Trace)
        }
    }

    match a_lang::driver::run(&cli.input, cli.mode) {
        Ok(code) => {
            if code == a_lang::driver::EXIT_OK {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(err) => {
            eprintln!("ac: {err}");
            ExitCode::FAILURE
        }
    }
}
