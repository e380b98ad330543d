//! Shared end-to-end test harness: spawns the built `ac` binary against a
//! fixture `.a` file and inspects the C compiler and produced program's
//! output, in the same spirit as the teacher's `test-utils` crate (which
//! spawned `./target/debug/why` and diffed stdout/stderr).
//!
//! `ac` always writes `output.c`/`program` into its current working
//! directory (spec §6 — there is no `-o` flag), so each check runs the
//! binary inside a freshly created, uniquely named scratch directory to
//! keep concurrently-running tests from treading on each other's output.

use std::{
    error::Error,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
    str,
    sync::atomic::{AtomicU64, Ordering},
};

const AC_PATH: &str = "./target/debug/ac";

static SCRATCH_COUNTER: AtomicU64 = AtomicU64::new(0);

fn scratch_dir(label: &str) -> PathBuf {
    let n = SCRATCH_COUNTER.fetch_add(1, Ordering::Relaxed);
    let dir = std::env::temp_dir().join(format!("a-lang-test-{}-{}-{n}", std::process::id(), label));
    fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn run_ac(src_path: &Path, mode: &str, workdir: &Path) -> Result<Output, io::Error> {
    Command::new(AC_PATH)
        .arg(src_path)
        .arg(mode)
        .current_dir(workdir)
        .output()
}

pub struct Expected<'a> {
    pub stdout: &'a str,
}

/// Compiles `src_path` in `mode`, runs the produced `program`, and asserts
/// its stdout matches `expected`. Used for the spec's successful
/// end-to-end scenarios.
pub fn check_run(label: &str, src_path: &Path, mode: &str, expected: Expected) -> Result<(), Box<dyn Error>> {
    let src_path = fs::canonicalize(src_path)?;
    let workdir = scratch_dir(label);

    let compile_output = run_ac(&src_path, mode, &workdir)?;
    let compile_stderr = str::from_utf8(&compile_output.stderr)?;
    assert!(
        compile_output.status.success(),
        "ac exited with status {:?} compiling {}: {compile_stderr}",
        compile_output.status.code(),
        src_path.display(),
    );

    let program_path = workdir.join("program");
    let run_output = Command::new(&program_path).output()?;
    assert_eq!(str::from_utf8(&run_output.stdout)?, expected.stdout);
    assert!(
        run_output.status.success(),
        "produced program exited with status {:?}",
        run_output.status.code()
    );

    fs::remove_dir_all(&workdir).ok();
    Ok(())
}

/// Compiles `src_path` in `mode` and asserts compilation fails (exit code 1)
/// without ever producing `output.c` — used for the spec's failing
/// structural-error scenario (e.g. raw mode missing `end`).
pub fn check_compile_fails(label: &str, src_path: &Path, mode: &str) -> Result<(), Box<dyn Error>> {
    let src_path = fs::canonicalize(src_path)?;
    let workdir = scratch_dir(label);

    let compile_output = run_ac(&src_path, mode, &workdir)?;
    assert!(
        !compile_output.status.success(),
        "expected ac to fail compiling {}",
        src_path.display()
    );
    assert!(
        !workdir.join("output.c").exists(),
        "output.c must not be written when compilation fails"
    );

    fs::remove_dir_all(&workdir).ok();
    Ok(())
}
